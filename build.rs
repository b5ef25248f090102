fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF link arguments are only needed for the device build; host
    // builds (tests, fuzzing) run without the ESP toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
