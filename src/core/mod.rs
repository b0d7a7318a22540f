// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Core functionalities of trunk width estimation.

pub mod boundary;
pub mod config;
pub mod denoise;
pub mod error;
pub mod mode_depth;
pub mod normalize;
pub mod orientation;
pub mod pipeline;
pub mod width;
