//! Generates Swift and Kotlin bindings for the bridge library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
