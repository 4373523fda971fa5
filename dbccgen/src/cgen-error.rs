/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

use dbcparser::DbcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CgenError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dbc(#[from] DbcError),

    #[error(transparent)]
    Format(#[from] std::fmt::Error),

    /// Signal cannot be packed into its message frame
    #[error("message:{message} signal:{signal} {reason}")]
    SignalLayout { message: String, signal: String, reason: String },

    #[error("invalid setting: {0}")]
    Config(String),
}
