//! Build script for mute-it
//!
//! Embeds the Windows application manifest (DPI awareness, common controls)
//! and links the Windows libraries used by the tray, hotkey and audio code.

fn main() {
    println!("cargo:rerun-if-changed=resources/app.rc");
    println!("cargo:rerun-if-changed=resources/app.manifest");

    // Only run on Windows
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    embed_resource::compile("resources/app.rc", embed_resource::NONE);

    println!("cargo:rustc-link-lib=ole32");
    println!("cargo:rustc-link-lib=user32");
    println!("cargo:rustc-link-lib=winmm");
}
