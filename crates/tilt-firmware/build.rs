//! Forwards tilt settings from the environment (or an optional `.env`) to the
//! firmware as compile-time variables.

const SETTINGS: [(&str, &str); 2] = [
    ("TILT_CALIBRATION_SAMPLES", "1"),
    ("TILT_I2C_FREQUENCY_KHZ", "400"),
];

fn main() {
    // A missing .env is fine; the defaults below apply.
    if let Ok(path) = dotenvy::dotenv() {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    for (key, default) in SETTINGS {
        let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
        println!("cargo:rerun-if-env-changed={key}");
        println!("cargo:rustc-env={key}={value}");
    }

    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
