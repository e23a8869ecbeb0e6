fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ORT_LIB_LOCATION");

    // Only point the linker at a custom ONNX Runtime SDK when one is given
    let Ok(sdk_path) = std::env::var("ORT_LIB_LOCATION") else {
        return;
    };

    println!("cargo:warning=Using ONNX Runtime SDK from: {}", sdk_path);

    let lib_path = format!("{}/lib", sdk_path);
    println!("cargo:rustc-link-search=native={}", lib_path);
    println!("cargo:warning=Lib directory: {}", lib_path);
}
