//! LEDC driver, PWM channel manager and task spawning helpers.

pub mod ledc;
pub mod pwm;
pub mod task_pin;
