/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

#![doc(
    html_logo_url = "https://iot.bzh/images/defaults/company/512-479-max-transp.png",
    html_favicon_url = "https://iot.bzh/images/defaults/favicon.ico"
)]

extern crate dbcparser;

#[path = "cgen-error.rs"]
pub mod error;

#[path = "cgen-naming.rs"]
pub mod naming;

#[path = "cgen-model.rs"]
pub mod model;

#[path = "cgen-gencode.rs"]
pub mod gencode;

#[path = "cgen-filter.rs"]
pub mod filter;

#[path = "cgen-driver.rs"]
pub mod driver;

pub use crate::driver::{generate_c_code, generate_c_files, DbcCGen};
pub use crate::error::CgenError;
pub use crate::gencode::{generate, CGenOptions};

/// `use dbccgen::prelude::*;`
pub mod prelude {
    pub use crate::driver::*;
    pub use crate::error::*;
    pub use crate::filter::*;
    pub use crate::gencode::{generate, CGenOptions, GENERATOR, GENERATOR_VERSION};
}
