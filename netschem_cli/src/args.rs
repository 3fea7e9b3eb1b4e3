use std::path::PathBuf;

use clap::{Parser, Subcommand};
use netschem_common::{CompileConfig, DelayCorner};

/// netschem - compile VPR netlists and SDF timing into schematic JSON
#[derive(Parser, Debug)]
#[command(name = "netschem")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log at debug level when RUST_LOG is unset
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile one structural netlist and its timing annotation
    Compile {
        /// Post-synthesis structural netlist (Verilog)
        #[arg(short = 'n', long)]
        netlist: PathBuf,

        /// Timing annotation (SDF)
        #[arg(short = 't', long)]
        timing: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Override the module name recorded in the document
        #[arg(long)]
        module_name: Option<String>,

        #[command(flatten)]
        options: CompileOptions,
    },
    /// Compile every design directory in parallel, writing `<stem>.json`
    /// next to each netlist
    Batch {
        /// Directories holding exactly one `.v` and one `.sdf` file
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        #[command(flatten)]
        options: CompileOptions,
    },
    /// Report dangling interconnect endpoints of a compiled document
    Check {
        /// Schematic JSON document
        document: PathBuf,
    },
}

/// Options shared by `compile` and `batch`.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileOptions {
    /// Delay corner read from min:typ:max triples
    #[arg(long, value_enum, default_value = "typ")]
    pub corner: CornerArg,

    /// Fail when an interconnect endpoint resolves to no known net
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl CompileOptions {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> CompileConfig {
        CompileConfig::new()
            .with_corner(self.corner.clone().into())
            .with_strict_endpoints(self.strict)
    }
}

/// Command-line argument wrapper for DelayCorner
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum CornerArg {
    /// Fastest figure
    #[value(name = "min")]
    Min,
    /// Typical figure
    #[value(name = "typ")]
    Typ,
    /// Slowest figure
    #[value(name = "max")]
    Max,
}

impl From<CornerArg> for DelayCorner {
    fn from(arg: CornerArg) -> Self {
        match arg {
            CornerArg::Min => DelayCorner::Min,
            CornerArg::Typ => DelayCorner::Typ,
            CornerArg::Max => DelayCorner::Max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_defaults() {
        let args = Args::try_parse_from(["netschem", "compile", "-n", "a.v", "-t", "a.sdf"]).unwrap();
        match args.command {
            Command::Compile { netlist, timing, output, module_name, options } => {
                assert_eq!(netlist, PathBuf::from("a.v"));
                assert_eq!(timing, PathBuf::from("a.sdf"));
                assert_eq!(output, None);
                assert_eq!(module_name, None);
                assert_eq!(options.to_config(), CompileConfig::default());
            }
            other => panic!("expected compile, got {other:?}"),
        }
        assert!(!args.verbose);
    }

    #[test]
    fn compile_options_map_to_config() {
        let args = Args::try_parse_from([
            "netschem", "-v", "compile", "-n", "a.v", "-t", "a.sdf", "--corner", "max", "--strict",
        ])
        .unwrap();
        assert!(args.verbose);
        let Command::Compile { options, .. } = args.command else {
            panic!("expected compile");
        };
        let config = options.to_config();
        assert_eq!(config.corner, DelayCorner::Max);
        assert!(config.strict_endpoints);
    }

    #[test]
    fn batch_requires_a_directory() {
        assert!(Args::try_parse_from(["netschem", "batch"]).is_err());
        assert!(Args::try_parse_from(["netschem", "batch", "d1", "d2", "--pretty"]).is_ok());
    }

    #[test]
    fn unknown_corner_is_rejected() {
        let parsed = Args::try_parse_from(["netschem", "compile", "-n", "a", "-t", "b", "--corner", "slow"]);
        assert!(parsed.is_err());
    }
}
