// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometry and statistics routines used by the pipeline stages.

pub mod hull;
pub mod pca;
pub mod rotation;
