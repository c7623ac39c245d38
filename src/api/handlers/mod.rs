// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

pub mod bots;
pub mod chat;
pub mod health;
pub mod likes;
pub mod metrics;
pub mod posts;
