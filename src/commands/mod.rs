// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod methods;
pub mod rules;
pub mod transactions;
pub mod run;
pub mod doctor;
