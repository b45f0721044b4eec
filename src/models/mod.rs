// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models shared by the API server and the client core.

pub mod recipe;
pub mod user;

pub use recipe::{Recipe, RecipeDocument, RecipeFields, RecipeInput, RecipeQuery};
pub use user::AuthenticatedUser;
