/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

//! Text filters run over generated C code before it is written.

use crate::gencode::GENERATOR;
use once_cell::sync::Lazy;
use regex::Regex;

pub const FRAME_ID_NAMESPACE: &str = "CANMSGS";
pub const STRUCT_PREFIX: &str = "App_";
pub const MACRO_PREFIX: &str = "APP_";

static GENERATED_BY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(This\sfile\swas\sgenerated\sby\s{})\sversion\s\d*\.\d*\.\d*\s.*",
        regex::escape(GENERATOR)
    ))
    .expect("valid regex")
});

static FRAME_ID_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{FRAME_ID_NAMESPACE}_(\w+?)_FRAME_ID\b")).expect("valid regex")
});

/// Drop generator version and date from the "generated by" comment.
#[must_use]
pub fn purge_timestamps(code: &str) -> String {
    GENERATED_BY.replace_all(code, "${1}").into_owned()
}

/// `CANMSGS_FOO_BAR_FRAME_ID` becomes `CANMSGS_foo_bar_FRAME_ID`.
#[must_use]
pub fn lowercase_frame_id_names(code: &str) -> String {
    FRAME_ID_NAME
        .replace_all(code, |caps: &regex::Captures| {
            format!("{FRAME_ID_NAMESPACE}_{}_FRAME_ID", caps[1].to_lowercase())
        })
        .into_owned()
}

#[must_use]
pub fn strip_struct_prefix(code: &str) -> String {
    code.replace(&format!("struct {STRUCT_PREFIX}"), "struct ")
}

#[must_use]
pub fn strip_macro_prefix(code: &str) -> String {
    code.replace(MACRO_PREFIX, "")
}

/// All filters, in order.
#[must_use]
pub fn post_process(code: &str) -> String {
    let code = purge_timestamps(code);
    let code = lowercase_frame_id_names(&code);
    let code = strip_struct_prefix(&code);
    strip_macro_prefix(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamp_is_purged() {
        let code = "/**\n * This file was generated by dbccgen version 0.1.0 Sat Oct 17 10:00:00 2026.\n */\n";
        assert_eq!(purge_timestamps(code), "/**\n * This file was generated by dbccgen\n */\n");
    }

    #[test]
    fn other_generators_are_kept() {
        let code = "This file was generated by cantools version 39.4.0 Sat Oct 17 10:00:00 2026.";
        assert_eq!(purge_timestamps(code), code);
    }

    #[test]
    fn frame_id_names_are_lowercased() {
        assert_eq!(
            lowercase_frame_id_names("#define APP_CANMSGS_FSM_STATUS_FRAME_ID (0x64u)"),
            "#define APP_CANMSGS_fsm_status_FRAME_ID (0x64u)"
        );
        assert_eq!(lowercase_frame_id_names("APP_CANMSGS_FOO_LENGTH"), "APP_CANMSGS_FOO_LENGTH");
    }

    #[test]
    fn frame_id_names_stay_on_their_line() {
        let code = "CANMSGS_A_FRAME_ID x\nCANMSGS_B_FRAME_ID";
        assert_eq!(lowercase_frame_id_names(code), "CANMSGS_a_FRAME_ID x\nCANMSGS_b_FRAME_ID");
    }

    #[test]
    fn frame_id_names_on_one_line() {
        assert_eq!(
            lowercase_frame_id_names("CANMSGS_FOO_FRAME_ID, CANMSGS_BAR_FRAME_ID"),
            "CANMSGS_foo_FRAME_ID, CANMSGS_bar_FRAME_ID"
        );
    }

    #[test]
    fn frame_id_inside_longer_token_is_kept() {
        let code = "#define APP_CANMSGS_FOO_FRAME_ID_ON_CHOICE (1u)";
        assert_eq!(lowercase_frame_id_names(code), code);
    }

    #[test]
    fn struct_prefix_is_stripped() {
        assert_eq!(strip_struct_prefix("struct App_CanMsgs_foo_t *src_p"), "struct CanMsgs_foo_t *src_p");
        assert_eq!(strip_struct_prefix("App_CanMsgs_foo_pack("), "App_CanMsgs_foo_pack(");
    }

    #[test]
    fn macro_prefix_is_stripped() {
        assert_eq!(strip_macro_prefix("#ifndef APP_CANMSGS_H"), "#ifndef CANMSGS_H");
        assert_eq!(strip_macro_prefix("App_CanMsgs_foo_init"), "App_CanMsgs_foo_init");
    }

    #[test]
    fn filters_run_in_order() {
        let code = " * This file was generated by dbccgen version 1.2.3 Mon Jan  5 01:02:03 2026.\n\
                    #define APP_CANMSGS_FOO_FRAME_ID (0x01u)\n\
                    int App_CanMsgs_foo_init(struct App_CanMsgs_foo_t *msg_p);\n";
        assert_eq!(
            post_process(code),
            " * This file was generated by dbccgen\n\
             #define CANMSGS_foo_FRAME_ID (0x01u)\n\
             int App_CanMsgs_foo_init(struct CanMsgs_foo_t *msg_p);\n"
        );
    }
}
