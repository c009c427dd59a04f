use crate::config::Config;
use crate::core::platforms::PlatformKind;

pub fn execute(config: &Config) {
    println!("Available lyrics platforms:");
    for line in platform_lines(config) {
        println!("  {}", line);
    }
}

fn platform_lines(config: &Config) -> Vec<String> {
    PlatformKind::ALL
        .iter()
        .map(|kind| {
            let status = match config.enabled_platforms.iter().position(|k| k == kind) {
                Some(pos) => format!("enabled #{}", pos + 1),
                None => "disabled".to_string(),
            };
            format!("{:<11} {:<11} {}", kind.as_str(), status, kind.description())
        })
        .collect()
}
