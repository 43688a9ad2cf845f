use clap::{ArgAction, Args, Parser, Subcommand};
use skipsign_core::config::{IdentityConfig, TagPolicy, ID_LEN};

#[derive(Parser, Debug, Clone)]
#[command(name = "skipsign", version, about = "Sign a list of node IDs")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins when unset.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign the node ids listed in a CSV file and write the signed list.
    Sign {
        /// Path to signing key (PEM).
        #[arg(short = 'k', long = "key-path", visible_alias = "keyPath")]
        key_path: String,

        /// Path to input CSV. First field of each row is a base64 node id.
        #[arg(
            short = 'c',
            long = "input-csv-path",
            visible_alias = "inputCSVPath",
            default_value = "ids.csv"
        )]
        input_csv_path: String,

        /// Path to output signed file.
        #[arg(short = 'o', long, default_value = "skipNodes.json")]
        output: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Verify a signed list against a public (or private) key.
    Verify {
        /// Signed list produced by `sign` (defaults to `sign`'s default output).
        #[arg(long, default_value = "skipNodes.json")]
        artifact: String,

        /// PUBLIC KEY or RSA PUBLIC KEY PEM, or the private key the list was signed with.
        #[arg(short = 'k', long)]
        key: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Byte length of a node id.
    #[arg(long, default_value_t = ID_LEN)]
    pub id_len: usize,

    /// Accept any value in the final (type) byte of a node id.
    #[arg(long)]
    pub any_tag: bool,
}

impl IdentityArgs {
    pub fn to_config(&self) -> IdentityConfig {
        IdentityConfig {
            len: self.id_len,
            tag_policy: if self.any_tag {
                TagPolicy::Any
            } else {
                TagPolicy::Known
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn sign_defaults() {
        let cli = Cli::try_parse_from(["skipsign", "sign", "-k", "key.pem"]).unwrap();
        match cli.command {
            Command::Sign {
                key_path,
                input_csv_path,
                output,
                identity,
            } => {
                assert_eq!(key_path, "key.pem");
                assert_eq!(input_csv_path, "ids.csv");
                assert_eq!(output, "skipNodes.json");
                assert_eq!(identity.to_config(), IdentityConfig::default());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn legacy_flag_names_accepted() {
        let cli = Cli::try_parse_from([
            "skipsign",
            "sign",
            "--keyPath",
            "k.pem",
            "--inputCSVPath",
            "in.csv",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Sign { ref input_csv_path, .. } if input_csv_path == "in.csv"
        ));
    }

    #[test]
    fn key_path_required() {
        assert!(Cli::try_parse_from(["skipsign", "sign"]).is_err());
    }

    #[test]
    fn verify_artifact_defaults_to_sign_output() {
        let cli = Cli::try_parse_from(["skipsign", "verify", "-k", "pub.pem"]).unwrap();
        let Command::Verify { artifact, key, .. } = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(artifact, "skipNodes.json");
        assert_eq!(key, "pub.pem");
    }

    #[test]
    fn identity_flags() {
        let cli = Cli::try_parse_from([
            "skipsign", "verify", "-k", "pub.pem", "--id-len", "8", "--any-tag",
        ])
        .unwrap();
        let Command::Verify { identity, .. } = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(
            identity.to_config(),
            IdentityConfig {
                len: 8,
                tag_policy: TagPolicy::Any
            }
        );
    }
}
