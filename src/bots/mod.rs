// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

pub mod context;
pub mod notifier;
pub mod orchestrator;
pub mod personas;
pub mod policy;
pub mod roster;
pub mod scheduler;
pub mod summarizer;

pub use notifier::{Notifier, WebhookNotifier};
pub use orchestrator::Orchestrator;
pub use policy::OrchestratorPolicy;
pub use roster::{BotIdentity, BotRoster};
