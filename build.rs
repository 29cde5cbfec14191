fn main() {
    // The host build (tests, simulation) has no ESP-IDF toolchain to probe.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
