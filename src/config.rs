//! Startup configuration. The simulation's only required parameter is the
//! world seed; log level and window size are host plumbing layered on top,
//! parsed by a small hand-rolled argument loop rather than a derive-macro
//! CLI since the surface is three flags wide.

use rand::RngCore;

/// Parsed startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// World seed driving terrain, structure, and tree generation.
    pub world_seed: u64,
    /// Overrides `RUST_LOG` when set.
    pub log_level: Option<String>,
    /// Initial window width, in pixels.
    pub width: u32,
    /// Initial window height, in pixels.
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_seed: random_seed(),
            log_level: None,
            width: 1280,
            height: 720,
        }
    }
}

impl Config {
    /// Parse CLI arguments (excluding argv[0]), falling back to defaults for
    /// anything unset or malformed. Parse errors are logged at `error!` and
    /// do not abort the process, matching the simulation's own no-panic
    /// error handling.
    pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut cfg = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => cfg.world_seed = value,
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--log-level" => {
                    if let Some(level) = args.next() {
                        cfg.log_level = Some(level);
                    } else {
                        tracing::error!("--log-level requires a value");
                    }
                }
                "--width" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u32>() {
                            Ok(value) if value > 0 => cfg.width = value,
                            _ => tracing::error!(value = %raw, "--width must be a positive integer"),
                        }
                    } else {
                        tracing::error!("--width requires an integer");
                    }
                }
                "--height" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u32>() {
                            Ok(value) if value > 0 => cfg.height = value,
                            _ => tracing::error!(value = %raw, "--height must be a positive integer"),
                        }
                    } else {
                        tracing::error!("--height requires an integer");
                    }
                }
                other => {
                    tracing::warn!(flag = %other, "unrecognized command-line flag, ignoring");
                }
            }
        }

        cfg
    }
}

/// A random 24-bit seed, used when `--seed` is omitted.
fn random_seed() -> u64 {
    (rand::rngs::OsRng.next_u64()) & 0x00FF_FFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_is_within_24_bits() {
        let cfg = Config::default();
        assert!(cfg.world_seed <= 0x00FF_FFFF);
    }

    #[test]
    fn explicit_seed_is_parsed() {
        let cfg = Config::parse(["--seed".to_string(), "12345".to_string()].into_iter());
        assert_eq!(cfg.world_seed, 12345);
    }

    #[test]
    fn malformed_seed_falls_back_to_a_random_default() {
        let cfg = Config::parse(["--seed".to_string(), "not-a-number".to_string()].into_iter());
        assert!(cfg.world_seed <= 0x00FF_FFFF);
    }

    #[test]
    fn width_and_height_are_parsed_together() {
        let cfg = Config::parse(
            ["--width".to_string(), "1920".to_string(), "--height".to_string(), "1080".to_string()]
                .into_iter(),
        );
        assert_eq!(cfg.width, 1920);
        assert_eq!(cfg.height, 1080);
    }

    #[test]
    fn log_level_override_is_captured() {
        let cfg = Config::parse(["--log-level".to_string(), "debug".to_string()].into_iter());
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }
}
