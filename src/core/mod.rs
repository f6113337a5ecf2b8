// ─── MCAdmin Core ───
// Backend for administering a Minecraft server installation.
//
// Architecture:
//   core/
//     workdir/  Working directory resolution + fixed layout
//     cache/    File cache + fetch-if-stale
//     version/  Mojang manifest, per-version artifacts, textures
//     world/    World directories
//     props/    Property list (ops/bans/whitelist) merge
//     state/    Per-process admin state

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod props;
pub mod state;
pub mod version;
pub mod workdir;
pub mod world;
