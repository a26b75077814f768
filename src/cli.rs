//! Command-line interface definition.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::classify::FileKind;

/// Version reported by `--version` and in the log header.
pub const VERSION: &str = match option_env!("INSTALLER_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Arguments recognized as flags; everything else is a file path.
const KNOWN_FLAGS: &[&str] = &[
    "-h",
    "--help",
    "-V",
    "--version",
    "-d",
    "--deb",
    "-a",
    "--appimage",
    "-b",
    "--binary",
    "-l",
    "--library",
    "-v",
    "--verbose",
];

const AFTER_HELP: &str = "\
Supported file types:
  - .deb packages (Debian/Ubuntu packages)
  - .AppImage files (Portable applications)
  - Binary executables
  - Libraries (.so, .a files)

Installation locations:
  - Binaries: ~/.local/bin/
  - Libraries: ~/.local/lib/
  - AppImages: ~/.local/share/appimages/
  - .deb packages: System-wide (requires sudo) or user-local";

/// Command-line interface for the per-user package installer.
#[derive(Parser, Debug)]
#[command(
    name = "installer",
    about = "Ubuntu/Debian Package Installer",
    version = VERSION,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Force install as .deb package
    #[arg(short, long, overrides_with_all = ["appimage", "binary", "library"])]
    pub deb: bool,

    /// Force install as `AppImage`
    #[arg(short, long, overrides_with_all = ["deb", "binary", "library"])]
    pub appimage: bool,

    /// Force install as binary
    #[arg(short, long, overrides_with_all = ["deb", "appimage", "library"])]
    pub binary: bool,

    /// Force install as library
    #[arg(short, long, overrides_with_all = ["deb", "appimage", "binary"])]
    pub library: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the home directory install roots are derived from
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Files to install
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Parse `args` (program name first), treating every argument that is
    /// not an exact known flag as a file path.
    ///
    /// Known flags are recognized anywhere on the line, including after
    /// files. Bundled short flags such as `-vl` are file paths.
    ///
    /// # Errors
    ///
    /// Returns the parser error for help, version, or a `--home` without a
    /// value.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(split_files(args))
    }

    /// Kind forced by a type flag, if any. The last flag given wins.
    #[must_use]
    pub fn forced_kind(&self) -> Option<FileKind> {
        [
            (self.deb, FileKind::DebPackage),
            (self.appimage, FileKind::AppImage),
            (self.binary, FileKind::Binary),
            (self.library, FileKind::Library),
        ]
        .into_iter()
        .find_map(|(set, kind)| set.then_some(kind))
    }
}

/// Reorder `args` so known flags come first and every other argument follows
/// a `--` separator.
fn split_files<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut flags: Vec<OsString> = args.next().into_iter().collect();
    let mut files = Vec::new();

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--home") => {
                flags.push(arg);
                flags.extend(args.next());
            }
            Some(s) if KNOWN_FLAGS.contains(&s) || s.starts_with("--home=") => flags.push(arg),
            _ => files.push(arg),
        }
    }

    flags.push(OsString::from("--"));
    flags.extend(files);
    flags
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_files_in_order() {
        let cli = Cli::parse_from(["installer", "b.deb", "a.AppImage"]);
        assert_eq!(
            cli.files,
            vec![PathBuf::from("b.deb"), PathBuf::from("a.AppImage")]
        );
        assert_eq!(cli.forced_kind(), None);
    }

    #[test]
    fn parse_forced_kinds() {
        let cases = [
            ("-d", FileKind::DebPackage),
            ("--deb", FileKind::DebPackage),
            ("-a", FileKind::AppImage),
            ("--appimage", FileKind::AppImage),
            ("-b", FileKind::Binary),
            ("--binary", FileKind::Binary),
            ("-l", FileKind::Library),
            ("--library", FileKind::Library),
        ];
        for (flag, kind) in cases {
            let cli = Cli::parse_from(["installer", flag, "foo.bin"]);
            assert_eq!(cli.forced_kind(), Some(kind), "flag {flag}");
        }
    }

    #[test]
    fn last_type_flag_wins() {
        let cli = Cli::parse_from(["installer", "-d", "-l", "foo"]);
        assert_eq!(cli.forced_kind(), Some(FileKind::Library));

        let cli = Cli::parse_from(["installer", "--library", "foo", "--appimage"]);
        assert_eq!(cli.forced_kind(), Some(FileKind::AppImage));
    }

    #[test]
    fn flags_may_follow_files() {
        let cli = Cli::parse_from(["installer", "tool", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.files, vec![PathBuf::from("tool")]);
    }

    #[test]
    fn flags_without_files_parse() {
        let cli = Cli::parse_from(["installer", "-v"]);
        assert!(cli.files.is_empty());
    }

    #[test]
    fn parse_home_override() {
        let cli = Cli::parse_from(["installer", "--home", "/tmp/h", "x.deb"]);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/h")));
    }

    #[test]
    fn unknown_flags_are_files() {
        let cli = Cli::parse_args(["installer", "--bogus", "good.so"]).unwrap();
        assert_eq!(
            cli.files,
            vec![PathBuf::from("--bogus"), PathBuf::from("good.so")]
        );
    }

    #[test]
    fn hyphenated_names_and_bundles_are_files() {
        let cli = Cli::parse_args(["installer", "-x.so", "-vl", "--", "-"]).unwrap();
        assert_eq!(
            cli.files,
            vec![
                PathBuf::from("-x.so"),
                PathBuf::from("-vl"),
                PathBuf::from("--"),
                PathBuf::from("-"),
            ]
        );
        assert!(!cli.verbose);
        assert_eq!(cli.forced_kind(), None);
    }

    #[test]
    fn known_flags_after_files_still_parse() {
        let cli =
            Cli::parse_args(["installer", "a.bin", "--weird", "-l", "-v", "-d", "b"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.forced_kind(), Some(FileKind::DebPackage));
        assert_eq!(
            cli.files,
            vec![
                PathBuf::from("a.bin"),
                PathBuf::from("--weird"),
                PathBuf::from("b"),
            ]
        );
    }

    #[test]
    fn home_value_is_not_a_file() {
        let cli = Cli::parse_args(["installer", "x.deb", "--home", "/tmp/h"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/h")));
        assert_eq!(cli.files, vec![PathBuf::from("x.deb")]);

        let cli = Cli::parse_args(["installer", "--home=/tmp/h2", "y.so"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/h2")));
        assert_eq!(cli.files, vec![PathBuf::from("y.so")]);
    }

    #[test]
    fn every_switch_is_a_known_flag() {
        let mut cmd = Cli::command();
        cmd.build();
        for arg in cmd.get_arguments() {
            if arg.is_positional() || arg.get_id() == "home" {
                continue;
            }
            if let Some(c) = arg.get_short() {
                assert!(KNOWN_FLAGS.contains(&format!("-{c}").as_str()), "-{c}");
            }
            if let Some(l) = arg.get_long() {
                assert!(KNOWN_FLAGS.contains(&format!("--{l}").as_str()), "--{l}");
            }
        }
    }

    #[test]
    fn help_and_version_still_short_circuit() {
        let err = Cli::parse_args(["installer", "--bogus", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = Cli::parse_args(["installer", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn help_lists_install_locations() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("~/.local/share/appimages/"));
        assert!(help.contains("--library"));
    }
}
