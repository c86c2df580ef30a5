fn main() {
    // Emit ESP-IDF linker/env metadata only when building real firmware;
    // host test builds carry no embuild dependency at all.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
