//! Entry point for the plyspin viewer.
//! Logging + CLI flags, then hand off to the platform layer.

use anyhow::Result;
use platform::ViewerConfig;

fn parse_config(args: impl Iterator<Item = String>) -> ViewerConfig {
    // Accept:
    //   --mesh=PATH            render a PLY mesh instead of the demo triangle
    //   --vert=PATH --frag=PATH  shader stage sources
    //   --size=WxH             initial window size
    //   --vertices=N --faces=N expected mesh record counts
    //   --strict-header        validate header-declared counts while loading
    let mut config = ViewerConfig::default();

    for arg in args {
        if let Some(val) = arg.strip_prefix("--mesh=") {
            config.mesh_path = Some(val.into());
        } else if let Some(val) = arg.strip_prefix("--vert=") {
            config.vert_path = val.into();
        } else if let Some(val) = arg.strip_prefix("--frag=") {
            config.frag_path = val.into();
        } else if let Some(val) = arg.strip_prefix("--size=") {
            if let Some((w, h)) = val.split_once('x').or_else(|| val.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (w.parse::<u32>(), h.parse::<u32>()) {
                    config.width = pw.max(1);
                    config.height = ph.max(1);
                }
            }
        } else if let Some(val) = arg.strip_prefix("--vertices=") {
            if let Ok(n) = val.parse::<usize>() {
                config.counts.vertices = n;
            }
        } else if let Some(val) = arg.strip_prefix("--faces=") {
            if let Ok(n) = val.parse::<usize>() {
                config.counts.faces = n;
            }
        } else if arg == "--strict-header" {
            config.strict_header = true;
        }
    }

    config
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_config(std::env::args().skip(1));
    log::info!(
        "Starting plyspin. mesh={:?}, shaders={}+{}, window={}x{}, strict_header={}",
        config.mesh_path,
        config.vert_path.display(),
        config.frag_path.display(),
        config.width,
        config.height,
        config.strict_header
    );

    platform::run(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> std::vec::IntoIter<String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse_config(args(&[]));
        assert!(config.mesh_path.is_none());
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.counts, asset::ply::BUNNY_COUNTS);
    }

    #[test]
    fn mesh_and_size_flags() {
        let config = parse_config(args(&["--mesh=bun_zipper.ply", "--size=800x600"]));
        assert_eq!(
            config.mesh_path.as_deref(),
            Some(std::path::Path::new("bun_zipper.ply"))
        );
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn count_overrides_and_strict_header() {
        let config = parse_config(args(&["--vertices=3", "--faces=1", "--strict-header"]));
        assert_eq!(config.counts.vertices, 3);
        assert_eq!(config.counts.faces, 1);
        assert!(config.strict_header);
    }

    #[test]
    fn malformed_size_is_ignored() {
        let config = parse_config(args(&["--size=huge"]));
        assert_eq!((config.width, config.height), (640, 480));
    }
}
