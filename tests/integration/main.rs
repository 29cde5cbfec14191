//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the LED against the
//! mock PWM driver.  All tests run on the host (x86_64) with no real
//! hardware required.

mod blink_tests;
mod mock_pwm;
