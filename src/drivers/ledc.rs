//! LEDC peripheral driver for the RGB LED.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `ledc_*` sys calls.  Fades use the IDF fade service in
//! non-blocking mode; a fade-end callback registered per channel forwards
//! the completion to whichever [`FadeCompletion`] started the fade.  A new
//! fade stops whatever still runs on its channel first, so an end event is
//! only ever reported to the owner of the fade that produced it.
//!
//! On host/test: duty registers live in memory and a fade completes the
//! moment it is started.

use std::sync::Arc;

use crate::app::ports::PwmDriver;
use crate::channels::{ChannelBinding, ChannelMap, TimerConfig};
use crate::error::DriverError;
use crate::fade::completion::FadeCompletion;

// ═══════════════════════════════════════════════════════════════════════════
//  ESP-IDF
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(target_os = "espidf")]
mod esp {
    use core::cell::RefCell;
    use core::ffi::c_void;

    use embassy_sync::blocking_mutex::Mutex;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use esp_idf_sys::*;
    use log::info;

    use super::*;
    use crate::channels::{CHANNEL_COUNT, LedChannel, SpeedMode};

    /// Where the fade-end ISR finds the completion for its channel.
    pub(super) struct FadeSlot {
        channel: LedChannel,
        done: Mutex<CriticalSectionRawMutex, RefCell<Option<Arc<FadeCompletion>>>>,
    }

    pub struct LedcPwm {
        // Boxed so the addresses handed to the ISR never move.
        slots: Box<[FadeSlot; CHANNEL_COUNT]>,
    }

    impl LedcPwm {
        pub fn new() -> Self {
            let slot = |channel| FadeSlot {
                channel,
                done: Mutex::new(RefCell::new(None)),
            };
            Self {
                slots: Box::new([
                    slot(LedChannel::Red),
                    slot(LedChannel::Green),
                    slot(LedChannel::Blue),
                ]),
            }
        }
    }

    fn mode(speed: SpeedMode) -> ledc_mode_t {
        match speed {
            #[cfg(esp32)]
            SpeedMode::High => ledc_mode_t_LEDC_HIGH_SPEED_MODE,
            #[cfg(not(esp32))]
            SpeedMode::High => ledc_mode_t_LEDC_LOW_SPEED_MODE,
            SpeedMode::Low => ledc_mode_t_LEDC_LOW_SPEED_MODE,
        }
    }

    /// Runs in ISR context.  Only touches the critical-section guarded slot
    /// and the completion queue.
    unsafe extern "C" fn fade_end_isr(param: *const ledc_cb_param_t, arg: *mut c_void) -> bool {
        // SAFETY: `arg` is the address of a slot inside the boxed array
        // owned by the LedcPwm, which lives for the program lifetime.
        let slot = unsafe { &*(arg as *const FadeSlot) };
        // SAFETY: the IDF passes a valid parameter block for the duration
        // of the callback.
        let event = unsafe { (*param).event };
        if event == ledc_cb_event_t_LEDC_FADE_END_EVT {
            slot.done.lock(|done| {
                if let Some(done) = done.borrow().as_ref() {
                    done.notify(slot.channel);
                }
            });
        }
        false
    }

    impl PwmDriver for LedcPwm {
        fn configure(
            &mut self,
            timer: &TimerConfig,
            channels: &ChannelMap,
        ) -> Result<(), DriverError> {
            let timer_cfg = ledc_timer_config_t {
                speed_mode: mode(timer.speed_mode),
                timer_num: timer.timer_index,
                duty_resolution: timer.resolution_bits as u32,
                freq_hz: timer.frequency_hz,
                clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
                ..Default::default()
            };
            // SAFETY: plain config struct copied by the driver.
            let ret = unsafe { ledc_timer_config(&timer_cfg) };
            if ret != ESP_OK as i32 {
                return Err(DriverError::TimerConfig(ret));
            }

            for b in channels.iter() {
                let ch_cfg = ledc_channel_config_t {
                    speed_mode: mode(b.speed_mode),
                    channel: b.hw_channel,
                    timer_sel: b.timer_index,
                    gpio_num: b.gpio,
                    intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
                    duty: 0,
                    hpoint: 0,
                    ..Default::default()
                };
                // SAFETY: as above.
                let ret = unsafe { ledc_channel_config(&ch_cfg) };
                if ret != ESP_OK as i32 {
                    return Err(DriverError::ChannelConfig { hw_channel: b.hw_channel, rc: ret });
                }
            }

            // SAFETY: installs the shared fade ISR; ESP_ERR_INVALID_STATE
            // means it is already installed.
            let ret = unsafe { ledc_fade_func_install(0) };
            if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
                return Err(DriverError::FadeInstall(ret));
            }

            for b in channels.iter() {
                let mut cbs = ledc_cbs_t {
                    fade_cb: Some(fade_end_isr),
                };
                let slot = &self.slots[b.channel.index()] as *const FadeSlot;
                // SAFETY: the slot outlives every fade on this channel.
                let ret = unsafe {
                    ledc_cb_register(mode(b.speed_mode), b.hw_channel, &mut cbs, slot as *mut c_void)
                };
                if ret != ESP_OK as i32 {
                    return Err(DriverError::CallbackRegister { hw_channel: b.hw_channel, rc: ret });
                }
            }

            info!("ledc: timer + {} channels configured, fade service installed", CHANNEL_COUNT);
            Ok(())
        }

        fn set_duty(&mut self, b: &ChannelBinding, duty: u32) -> Result<(), DriverError> {
            // SAFETY: channel configured in `configure`.
            let ret = unsafe { ledc_set_duty(mode(b.speed_mode), b.hw_channel, duty) };
            if ret != ESP_OK as i32 {
                return Err(DriverError::SetDuty { hw_channel: b.hw_channel, rc: ret });
            }
            Ok(())
        }

        fn update_duty(&mut self, b: &ChannelBinding) -> Result<(), DriverError> {
            // SAFETY: channel configured in `configure`.
            let ret = unsafe { ledc_update_duty(mode(b.speed_mode), b.hw_channel) };
            if ret != ESP_OK as i32 {
                return Err(DriverError::UpdateDuty { hw_channel: b.hw_channel, rc: ret });
            }
            Ok(())
        }

        fn duty(&self, b: &ChannelBinding) -> u32 {
            // SAFETY: register read.
            unsafe { ledc_get_duty(mode(b.speed_mode), b.hw_channel) }
        }

        fn start_fade(
            &mut self,
            b: &ChannelBinding,
            target: u32,
            duration_ms: u32,
            done: &Arc<FadeCompletion>,
        ) -> Result<(), DriverError> {
            let slot = &self.slots[b.channel.index()].done;
            let speed = mode(b.speed_mode);

            // A fade left running by the other cadence must neither delay
            // this one nor report its end to our completion.
            slot.lock(|cell| *cell.borrow_mut() = None);
            // SAFETY: channel configured and fade service installed.
            let ret = unsafe { ledc_fade_stop(speed, b.hw_channel) };
            if ret != ESP_OK as i32 {
                return Err(DriverError::Fade { hw_channel: b.hw_channel, rc: ret });
            }
            // SAFETY: as above.
            let ret = unsafe {
                ledc_set_fade_with_time(speed, b.hw_channel, target, duration_ms as i32)
            };
            if ret != ESP_OK as i32 {
                return Err(DriverError::Fade { hw_channel: b.hw_channel, rc: ret });
            }
            slot.lock(|cell| *cell.borrow_mut() = Some(done.clone()));
            // SAFETY: as above; NO_WAIT returns before the ramp ends.
            let ret = unsafe {
                ledc_fade_start(speed, b.hw_channel, ledc_fade_mode_t_LEDC_FADE_NO_WAIT)
            };
            if ret != ESP_OK as i32 {
                return Err(DriverError::Fade { hw_channel: b.hw_channel, rc: ret });
            }
            Ok(())
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::LedcPwm;

// ═══════════════════════════════════════════════════════════════════════════
//  Host simulation
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(not(target_os = "espidf"))]
pub struct LedcPwm {
    staged: [u32; 3],
    duties: [u32; 3],
    configured: bool,
}

#[cfg(not(target_os = "espidf"))]
impl LedcPwm {
    pub fn new() -> Self {
        Self {
            staged: [0; 3],
            duties: [0; 3],
            configured: false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(not(target_os = "espidf"))]
impl PwmDriver for LedcPwm {
    fn configure(&mut self, timer: &TimerConfig, _channels: &ChannelMap) -> Result<(), DriverError> {
        log::info!(
            "ledc(sim): {} Hz / {}-bit, no hardware",
            timer.frequency_hz,
            timer.resolution_bits
        );
        self.configured = true;
        Ok(())
    }

    fn set_duty(&mut self, b: &ChannelBinding, duty: u32) -> Result<(), DriverError> {
        self.staged[b.channel.index()] = duty;
        Ok(())
    }

    fn update_duty(&mut self, b: &ChannelBinding) -> Result<(), DriverError> {
        let i = b.channel.index();
        self.duties[i] = self.staged[i];
        Ok(())
    }

    fn duty(&self, b: &ChannelBinding) -> u32 {
        self.duties[b.channel.index()]
    }

    fn start_fade(
        &mut self,
        b: &ChannelBinding,
        target: u32,
        _duration_ms: u32,
        done: &Arc<FadeCompletion>,
    ) -> Result<(), DriverError> {
        let i = b.channel.index();
        self.staged[i] = target;
        self.duties[i] = target;
        done.notify(b.channel);
        Ok(())
    }
}

impl Default for LedcPwm {
    fn default() -> Self {
        Self::new()
    }
}
