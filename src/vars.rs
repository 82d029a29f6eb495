use chrono::{DateTime, Utc};
use std::sync::OnceLock;

macro_rules! env_config {
    ($name:ident, $env_key:expr, $default:expr) => {
        paste::paste! {
            pub static [<MDSWEEP_ $name>]: ::std::sync::LazyLock<&'static str> = ::std::sync::LazyLock::new(|| {
                ::std::boxed::Box::leak(
                    ::std::env::var($env_key)
                        .unwrap_or_else(|_| $default.to_string())
                        .into_boxed_str()
                )
            });
        }
    };
    ($name:ident, $default:expr) => {
        env_config!($name, concat!("MDSWEEP_", stringify!($name)), $default);
    };
}

env_config!(HOST, "localhost");
env_config!(PORT, "8080");
env_config!(VAULT_DIR, ".");
env_config!(SETTINGS_FILE, "mdsweep.json");
env_config!(TRASH_MODE, "local");
env_config!(API_KEY, "");

pub static STARTED_AT: OnceLock<DateTime<Utc>> = OnceLock::new();

pub fn init_started_at() {
    let _ = STARTED_AT.set(Utc::now());
}
