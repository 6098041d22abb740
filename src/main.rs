//! meshseq-viewer: open a numbered OBJ sequence and scrub through it

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use meshseq::prelude::*;
use meshseq::visualization::NativeFilePicker;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meshseq-viewer", version, about = "View numbered OBJ mesh sequences")]
struct Args {
    /// Any frame of the sequence; a file dialog opens when no input is given
    #[arg(value_name = "INPUT", value_parser = existing_file, conflicts_with = "input_flag")]
    input: Option<PathBuf>,

    /// Same as INPUT
    #[arg(id = "input_flag", short = 'i', long = "input", value_name = "PATH", value_parser = existing_file)]
    input_flag: Option<PathBuf>,

    /// Number of the first frame file
    #[arg(short = 's', long = "start", value_name = "START_ID", default_value_t = 0)]
    start: u32,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Write the sequence to meshSequence/ and exit without opening a window
    #[arg(long)]
    export_meshes: bool,
}

fn existing_file(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file does not exist: {}", value))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let storage = DiskStorage::new();
    let mut session = Session::new(SessionConfig {
        start_id: args.start,
        ..SessionConfig::default()
    });

    let path = match args.input.or(args.input_flag) {
        Some(path) => path,
        None => NativeFilePicker::new()
            .pick_frame_file()
            .context("No frame file was selected")?,
    };

    session
        .load(&path, &storage)
        .with_context(|| format!("Failed to load the sequence of {}", path.display()))?;

    if args.export_meshes {
        let folder = session.export_meshes(&storage)?;
        info!("wrote {} meshes to {}", session.num_frames(), folder.display());
        return Ok(());
    }

    let config = ViewerConfig {
        width: args.width,
        height: args.height,
        ..ViewerConfig::default()
    };
    SequenceViewer::new(config, session).run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["meshseq-viewer"]).unwrap();
        assert_eq!(args.start, 0);
        assert_eq!((args.width, args.height), (1024, 1024));
        assert!(args.input.is_none() && args.input_flag.is_none());
        assert!(!args.export_meshes);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let result = Args::try_parse_from(["meshseq-viewer", "-i", "/definitely/not/here/mesh0.obj"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_flag() {
        let args = Args::try_parse_from(["meshseq-viewer", "--start", "12", "--width", "640"]).unwrap();
        assert_eq!(args.start, 12);
        assert_eq!(args.width, 640);
    }
}
