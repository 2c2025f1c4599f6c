// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity.

pub mod bookings;
pub mod contacts;
pub mod guests;
pub mod hotels;
pub mod tickets;
