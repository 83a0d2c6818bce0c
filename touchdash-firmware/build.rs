//! Build script for touchdash-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs owned by the UART0, I2C0 and SPI1 buses
const BUS_PINS: [i64; 6] = [0, 1, 4, 5, 10, 11];

const PIN_KEYS: [&str; 5] = [
    "display_cs",
    "display_dc",
    "display_reset",
    "backlight",
    "touch_reset",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds panel.toml from the touchdash-firmware      ║\n\
            ║  directory. Create one before building.                          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read panel.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in panel.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_touch(&config, &mut errors);
    validate_serial(&config, &mut errors);
    validate_loop(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid panel.toml", &errors);
    }

    println!("cargo:warning=panel.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.clone()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    const KNOWN: [&str; 6] = ["display", "touch", "serial", "loop", "startup", "pins"];

    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !KNOWN.contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a section", name));
        }
    }
}

fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
        return;
    };
    match value.as_integer() {
        Some(v) if (min..=max).contains(&v) => {}
        Some(_) => errors.push(format!("[{}] {} must be {}-{}", section, key, min, max)),
        None => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "display", "width", 1, 4096, errors);
    check_range(config, "display", "height", 1, 4096, errors);
    check_range(config, "display", "refresh_ms", 1, 10_000, errors);
    check_range(config, "display", "self_test_ms", 0, 60_000, errors);

    let height = int(config, "display", "height").unwrap_or(320);
    check_range(config, "display", "draw_buffer_lines", 1, height, errors);

    if let Some(v) = config.get("display").and_then(|d| d.get("self_test")) {
        if !v.is_bool() {
            errors.push("[display] self_test must be true or false".into());
        }
    }
}

fn validate_touch(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(rotation) = int(config, "touch", "rotation") {
        if ![0, 90, 180, 270].contains(&rotation) {
            errors.push("[touch] rotation must be 0, 90, 180 or 270".into());
        }
    }
    check_range(config, "touch", "poll_ms", 1, 10_000, errors);
    check_range(config, "touch", "address", 0, 0x7F, errors);
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "serial", "baudrate", 1, 4_000_000, errors);
    check_range(config, "serial", "max_line", 1, 256, errors);

    if let Some(v) = config.get("serial").and_then(|s| s.get("malformed")) {
        if !matches!(v.as_str(), Some("reject") | Some("zero")) {
            errors.push("[serial] malformed must be 'reject' or 'zero'".into());
        }
    }
}

fn validate_loop(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "loop", "delay_ms", 0, 10_000, errors);
    check_range(config, "startup", "attempts", 0, 255, errors);
    check_range(config, "startup", "retry_delay_ms", 0, 60_000, errors);
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins") else {
        return;
    };

    let mut seen = Vec::new();
    for key in PIN_KEYS {
        let Some(value) = pins.get(key) else {
            continue;
        };
        let Some(pin) = value.as_str().and_then(parse_pin) else {
            errors.push(format!("[pins] {} must be \"gpioN\" or \"!gpioN\"", key));
            continue;
        };
        if pin > 29 {
            errors.push(format!("[pins] {}: gpio{} does not exist", key, pin));
        } else if BUS_PINS.contains(&pin) {
            errors.push(format!("[pins] {}: gpio{} is a bus pin", key, pin));
        } else if seen.contains(&pin) {
            errors.push(format!("[pins] {}: gpio{} assigned twice", key, pin));
        }
        seen.push(pin);
    }
}

fn parse_pin(s: &str) -> Option<i64> {
    let s = s.strip_prefix('!').unwrap_or(s);
    s.strip_prefix("gpio")?.parse().ok()
}
