use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::config::AdminConfig;
use crate::core::error::{AdminError, AdminResult};
use crate::core::state::AdminState;
use crate::core::version::manifest::MANIFEST_CACHE_KEY;
use crate::core::version::{Channel, VersionArtifacts, VersionManifest};

/// Tools and utilities for managing a Minecraft server installation
#[derive(Parser, Debug)]
#[command(name = "mcadmin", version)]
pub struct Cli {
    /// Working directory (overrides MC_ADMIN_PATH, default ~/mcadmin)
    #[arg(long, short = 'w', global = true)]
    pub work_dir: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub debug: bool,
    /// Refetch the version manifest and version JSONs even when cached
    #[arg(long, global = true)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the working directory layout
    Init,
    /// Check whether the working directory is initialized
    Status,
    /// Show the latest release and snapshot
    Latest,
    /// List known versions
    Versions {
        /// List snapshots instead of releases
        #[arg(long)]
        snapshots: bool,
    },
    /// Check whether a newer version of the same channel exists
    CheckUpdate { version: String },
    /// Print the version manifest, or one version's manifest
    Manifest { version: Option<String> },
    /// Download the client jar of a version
    ClientJar { version: String },
    /// Download the server jar of a version
    ServerJar { version: String },
    /// Extract textures from a version's client jar
    Textures { version: String },
    /// Remove a version's cached jars and textures
    Purge { version: String },
    /// Remove every file from the download cache
    ClearCache,
    /// Manage worlds
    World {
        #[command(subcommand)]
        action: WorldCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorldCommand {
    /// Create a world directory (the name is normalized)
    Create { name: String },
    /// List worlds
    List,
}

impl Command {
    fn requires_init(&self) -> bool {
        !matches!(self, Command::Init | Command::Status)
    }
}

impl Cli {
    pub fn config(&self) -> AdminConfig {
        AdminConfig {
            work_dir: self.work_dir.clone(),
            debug: self.debug,
            force_refresh: self.refresh,
        }
    }
}

pub async fn execute(command: Command, state: &mut AdminState) -> AdminResult<()> {
    if command.requires_init() {
        state.workdir.ensure_initialized()?;
    }

    match command {
        Command::Init => {
            state.workdir.initialize()?;
            println!("{}", state.workdir.root().display());
        }
        Command::Status => {
            if !state.workdir.is_initialized() {
                return Err(AdminError::NotInitialized(state.workdir.root().to_path_buf()));
            }
            println!("initialized: {}", state.workdir.root().display());
        }
        Command::Latest => {
            let manifest = state.versions().await?;
            println!("Release : {}", manifest.latest(Channel::Release));
            println!("Snapshot: {}", manifest.latest(Channel::Snapshot));
        }
        Command::Versions { snapshots } => {
            let manifest = state.versions().await?;
            let entries = if snapshots {
                manifest.snapshots()
            } else {
                manifest.releases()
            };
            for entry in entries {
                println!("{}", entry.id);
            }
        }
        Command::CheckUpdate { version } => {
            let manifest = state.versions().await?;
            check_update(&manifest, &version)?;
        }
        Command::Manifest { version: None } => {
            // Loading first guarantees the cache entry exists.
            state.versions().await?;
            let raw = state.cache.load(MANIFEST_CACHE_KEY).await?;
            let raw: serde_json::Value = serde_json::from_slice(&raw)?;
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
        Command::Manifest {
            version: Some(version),
        } => {
            let artifacts = state.version(&version).await?;
            println!("{}", serde_json::to_string_pretty(artifacts.raw())?);
        }
        Command::ClientJar { version } => {
            let artifacts = state.version(&version).await?;
            let path = artifacts.ensure_client_jar(state.transport()).await?;
            println!("{}", path.display());
        }
        Command::ServerJar { version } => {
            let artifacts = state.version(&version).await?;
            let path = artifacts.ensure_server_jar(state.transport()).await?;
            println!("{}", path.display());
        }
        Command::Textures { version } => {
            let artifacts = state.version(&version).await?;
            let written = artifacts.extract_textures(state.transport()).await?;
            info!("{} texture files written", written);
            println!("{}", artifacts.texture_dir().display());
        }
        Command::Purge { version } => {
            // Purging works from the directory alone; no manifest needed.
            let artifacts = VersionArtifacts::new(
                &version,
                state.workdir.version_dir(&version)?,
                serde_json::Value::Object(Default::default()),
            )?;
            artifacts.purge_cache().await?;
        }
        Command::ClearCache => {
            let removed = state.cache.clear().await?;
            println!("{removed}");
        }
        Command::World { action } => match action {
            WorldCommand::Create { name } => {
                let world = state.worlds.create(&name).await?;
                println!("{}", world.path.display());
            }
            WorldCommand::List => {
                for world in state.worlds.list().await? {
                    println!("{}", world.name);
                }
            }
        },
    }

    Ok(())
}

fn check_update(manifest: &VersionManifest, version: &str) -> AdminResult<()> {
    let channel = manifest
        .resolve_type(version)
        .ok_or_else(|| AdminError::UnknownVersion(version.to_string()))?;
    let latest = manifest.latest(channel);

    if manifest.is_update_available(version) {
        let scope = if manifest.is_major_update(version) {
            "major"
        } else if manifest.is_minor_update(version) {
            "minor"
        } else {
            "revision"
        };
        println!("{} update available: {} -> {}", scope, version, latest);
    } else {
        println!("{} is up to date (latest {} is {})", version, channel, latest);
    }

    Ok(())
}
