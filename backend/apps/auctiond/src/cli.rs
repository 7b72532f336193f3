//! Command Line

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "auctiond", about = "Replicated auction service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the name directory
    Directory {
        /// Listen address (defaults to DIRECTORY_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Run one replica of the auction state
    Replica {
        /// Replica ID; the node registers as Replica<id>
        #[arg(long)]
        id: i32,
        #[arg(long)]
        bind: SocketAddr,
        /// Base URL peers use to reach this node
        #[arg(long)]
        advertise: Option<String>,
    },

    /// Run the failover front-end
    Frontend {
        #[arg(long)]
        bind: SocketAddr,
        /// Base URL clients use to reach this node
        #[arg(long)]
        advertise: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replica() {
        let cli = Cli::try_parse_from([
            "auctiond",
            "replica",
            "--id",
            "2",
            "--bind",
            "127.0.0.1:9002",
        ])
        .unwrap();

        match cli.command {
            Command::Replica {
                id,
                bind,
                advertise,
            } => {
                assert_eq!(id, 2);
                assert_eq!(bind.port(), 9002);
                assert_eq!(advertise, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replica_requires_id() {
        assert!(Cli::try_parse_from(["auctiond", "replica", "--bind", "127.0.0.1:1"]).is_err());
    }

    #[test]
    fn test_parse_directory_default_bind() {
        let cli = Cli::try_parse_from(["auctiond", "directory"]).unwrap();
        assert!(matches!(cli.command, Command::Directory { bind: None }));
    }
}
