use dotenvy::dotenv_iter;
use embuild::espidf;

fn main() {
    load_dotenv_variables();

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        espidf::sysenv::output();
    }
}

/// Bakes the dashboard secrets into the firmware image.
///
/// The panel has no file system to read `.env` from at runtime, so the values are
/// resolved on the build host:
/// 1. `dotenvy` reads the key-value pairs from the local `.env` file.
/// 2. Each pair is emitted as `cargo:rustc-env=KEY=VALUE`.
/// 3. `config.rs` picks them up with `option_env!`.
///
/// Expected keys: `WIFI_SSID`, `WIFI_PASS`, `HA_BASE_URL`, `HA_TOKEN` and optionally
/// `TIMEZONE`. A missing `.env` is fine for host builds; the firmware then ships with
/// empty credentials and will sit on the "Disconnected" indicator.
///
/// # Security Note
/// The Home Assistant long-lived token ends up in flash in plain text. Use a token
/// scoped to a read-only user.
fn load_dotenv_variables() {
    println!("cargo:rerun-if-changed=.env");

    if let Ok(iter) = dotenv_iter() {
        for item in iter {
            match item {
                Ok((key, value)) => println!("cargo:rustc-env={}={}", key, value),
                Err(e) => println!("cargo:warning=Skipping unreadable .env entry: {}", e),
            }
        }
    }
}
