//! # Raidledger - Weekly Raid & Gold Tracker
//!
//! Raidledger tracks per-character weekly progress for an online game roster:
//! raid clears, gold income, daily/weekly mission checklists, and the fixed
//! in-game reset schedule (06:00 daily, Wednesday 06:00 weekly).
//!
//! ## Features
//!
//! - **Character Store**: CRUD and sorting over the tracked roster, with a
//!   single-writer mutation model and watch-channel snapshots for readers.
//! - **Scheduled Resets**: idempotent daily/weekly rollover applied once per
//!   launch during startup reconciliation; no timers.
//! - **Raid Catalog**: authoritative payout table used to build contiguous
//!   stage selections and to resync stored gold values across app versions.
//! - **Aggregates**: pure account-wide overview (earned, potential, and
//!   last-week gold; mission completion counts).
//! - **Validation**: total, never-throwing validators for gold amounts and
//!   nicknames.
//! - **Persistence**: sled-backed key-value store, JSON text values.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use raidledger::roster::{CharacterStoreBuilder, NewCharacter, SortOrder};
//! use raidledger::storage::KvStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let kv = Arc::new(KvStore::open("./data/kv")?);
//!     let store = CharacterStoreBuilder::new(kv).open().await?;
//!
//!     store
//!         .add(
//!             NewCharacter {
//!                 name: "Arkanis".into(),
//!                 class_name: "Bard".into(),
//!                 server_name: "Luterra".into(),
//!                 item_level: "1,540".into(),
//!                 ..Default::default()
//!             },
//!             SortOrder::AddedAt,
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`roster`] - Character store, raid catalog, resets, aggregates
//! - [`storage`] - Key-value persistence layer
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Input validation for amounts and nicknames
//! - [`logutil`] - Log sanitization helpers

pub mod config;
pub mod logutil;
pub mod roster;
pub mod storage;
pub mod validation;
