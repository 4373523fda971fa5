/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Source code derivate from: (MIT License)
 *  - https://github.com/cantools/cantools Copyright: Erik Moqvist (c_source generator)
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 *
 * Reference: http://mcu.so/Microcontroller/Automotive/dbc-file-format-documentation_compress.pdf
 */
use crate::error::CgenError;
use crate::model::{CMessage, CSignal, ShiftDirection};
use dbcparser::data::DbcObject;
use std::collections::BTreeSet;
use std::fmt::{self, Write};

pub const GENERATOR: &str = "dbccgen";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

const IDT0: &str = "";
const IDT1: &str = "    ";
const IDT2: &str = "        ";

macro_rules! code_output {
 ($code:ident, $indent:ident, $format:expr, $( $args:expr ),*) => {
    $code.output ($indent,  format! ($format, $($args),*))
 };
 ($code:ident, $indent:ident,$format:expr) => {
    $code.output ($indent, $format)
 }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CGenOptions {
    /// emit `_encode`/`_decode` helpers
    pub floating_point_numbers: bool,
    /// declare struct members as C bit-fields
    pub bit_fields: bool,
    /// `float` instead of `double` in encode/decode helpers
    pub use_float: bool,
}

impl Default for CGenOptions {
    fn default() -> Self {
        CGenOptions { floating_point_numbers: true, bit_fields: false, use_float: false }
    }
}

#[derive(Default)]
pub struct CodeText {
    text: String,
}

pub trait Text2Str<T> {
    fn write(&mut self, indent: &str, text: T) -> fmt::Result;
}

impl Text2Str<&str> for CodeText {
    fn write(&mut self, indent: &str, text: &str) -> fmt::Result {
        writeln!(self.text, "{indent}{text}")
    }
}

impl Text2Str<String> for CodeText {
    fn write(&mut self, indent: &str, text: String) -> fmt::Result {
        <Self as Text2Str<&str>>::write(self, indent, text.as_str())
    }
}

impl CodeText {
    fn output<T>(&mut self, indent: &str, text: T) -> fmt::Result
    where
        CodeText: Text2Str<T>,
    {
        <Self as Text2Str<T>>::write(self, indent, text)
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// C float literal, `1` becomes `1.0` (or `1.0f`)
fn c_float_literal(value: f64, use_float: bool) -> String {
    let mut literal = format!("{value}");
    if !literal.contains(['.', 'e', 'E']) && value.is_finite() {
        literal.push_str(".0");
    }
    if use_float {
        literal.push('f');
    }
    literal
}

struct CGen<'a> {
    database_name: &'a str,
    options: &'a CGenOptions,
    date: String,
    messages: Vec<CMessage<'a>>,
}

impl<'a> CGen<'a> {
    fn float_type(&self) -> &'static str {
        if self.options.use_float { "float" } else { "double" }
    }

    fn float(&self, value: f64) -> String {
        c_float_literal(value, self.options.use_float)
    }

    fn struct_name(&self, msg: &CMessage) -> String {
        format!("{}_{}_t", self.database_name, msg.snake_name)
    }

    fn func_prefix(&self, msg: &CMessage) -> String {
        format!("{}_{}", self.database_name, msg.snake_name)
    }

    fn macro_prefix(&self, msg: &CMessage) -> String {
        format!("{}_{}", self.database_name.to_uppercase(), msg.upper_name)
    }

    fn gen_banner(&self, code: &mut CodeText, file_name: &str) -> fmt::Result {
        code_output!(code, IDT0, "/**")?;
        code_output!(code, IDT0, " * @file {}", file_name)?;
        code_output!(code, IDT0, " *")?;
        code_output!(
            code,
            IDT0,
            " * This file was generated by {} version {} {}.",
            GENERATOR,
            GENERATOR_VERSION,
            self.date
        )?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * WARNING: Manual modification will be destroyed")?;
        code_output!(code, IDT0, " */\n")?;
        Ok(())
    }

    fn gen_defines(&self, code: &mut CodeText) -> fmt::Result {
        code_output!(code, IDT0, "/* Frame ids. */")?;
        for msg in &self.messages {
            code_output!(
                code,
                IDT0,
                "#define {}_FRAME_ID (0x{:02x}u)",
                self.macro_prefix(msg),
                msg.message.id.frame_id()
            )?;
        }

        code_output!(code, IDT0, "\n/* Frame lengths in bytes. */")?;
        for msg in &self.messages {
            code_output!(code, IDT0, "#define {}_LENGTH ({}u)", self.macro_prefix(msg), msg.message.size)?;
        }

        code_output!(code, IDT0, "\n/* Extended or standard frame types. */")?;
        for msg in &self.messages {
            code_output!(
                code,
                IDT0,
                "#define {}_IS_EXTENDED ({})",
                self.macro_prefix(msg),
                u8::from(msg.message.id.is_extended())
            )?;
        }

        code_output!(code, IDT0, "\n/* Frame cycle times in milliseconds. */")?;
        for msg in &self.messages {
            if let Some(cycle_time) = msg.cycle_time {
                code_output!(code, IDT0, "#define {}_CYCLE_TIME_MS ({}u)", self.macro_prefix(msg), cycle_time)?;
            }
        }

        code_output!(code, IDT0, "\n/* Signal choices. */")?;
        for msg in &self.messages {
            for sig in &msg.signals {
                for (name, value) in &sig.choices {
                    let suffix = if *value < 0 { "" } else { "u" };
                    code_output!(
                        code,
                        IDT0,
                        "#define {}_{}_{}_CHOICE ({}{})",
                        self.macro_prefix(msg),
                        sig.upper_name,
                        name,
                        value,
                        suffix
                    )?;
                }
            }
        }
        code_output!(code, IDT0, "")?;
        Ok(())
    }

    fn gen_signal_member(&self, code: &mut CodeText, sig: &CSignal) -> fmt::Result {
        let signal = sig.signal;
        code_output!(code, IDT1, "/**")?;
        if let Some(comment) = sig.comment {
            for line in comment.trim().lines() {
                code_output!(code, IDT1, " * {}", line)?;
            }
            code_output!(code, IDT1, " *")?;
        }
        match sig.raw_range() {
            Some((low, high)) => code_output!(
                code,
                IDT1,
                " * Range: {}..{} ({}..{} {})",
                low,
                high,
                signal.min,
                signal.max,
                signal.unit
            )?,
            None => code_output!(code, IDT1, " * Range: -")?,
        }
        code_output!(code, IDT1, " * Scale: {}", signal.factor)?;
        code_output!(code, IDT1, " * Offset: {}", signal.offset)?;
        code_output!(code, IDT1, " */")?;

        if self.options.bit_fields && !sig.is_float {
            code_output!(code, IDT1, "{} {} : {};", sig.type_name(), sig.snake_name, signal.size)
        } else {
            code_output!(code, IDT1, "{} {};", sig.type_name(), sig.snake_name)
        }
    }

    fn gen_struct(&self, code: &mut CodeText, msg: &CMessage) -> fmt::Result {
        code_output!(code, IDT0, "/**")?;
        code_output!(code, IDT0, " * Signals in message {}.", msg.message.name)?;
        if let Some(comment) = msg.comment {
            code_output!(code, IDT0, " *")?;
            for line in comment.trim().lines() {
                code_output!(code, IDT0, " * {}", line)?;
            }
        }
        code_output!(code, IDT0, " */")?;
        code_output!(code, IDT0, "struct {} {{", self.struct_name(msg))?;
        if msg.signals.is_empty() {
            code_output!(code, IDT1, "/**")?;
            code_output!(code, IDT1, " * Dummy signal in empty message.")?;
            code_output!(code, IDT1, " */")?;
            code_output!(code, IDT1, "uint8_t dummy;")?;
        }
        for (idx, sig) in msg.signals.iter().enumerate() {
            if idx > 0 {
                code_output!(code, IDT0, "")?;
            }
            self.gen_signal_member(code, sig)?;
        }
        code_output!(code, IDT0, "};\n")?;
        Ok(())
    }

    fn gen_prototypes(&self, code: &mut CodeText, msg: &CMessage) -> fmt::Result {
        let prefix = self.func_prefix(msg);
        let struct_name = self.struct_name(msg);

        code_output!(code, IDT0, "/**")?;
        code_output!(code, IDT0, " * Pack message {}.", msg.message.name)?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @param[out] dst_p Buffer to pack the message into.")?;
        code_output!(code, IDT0, " * @param[in] src_p Data to pack.")?;
        code_output!(code, IDT0, " * @param[in] size Size of dst_p.")?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @return Size of packed data, or negative error code.")?;
        code_output!(code, IDT0, " */")?;
        code_output!(code, IDT0, "int {}_pack(", prefix)?;
        code_output!(code, IDT1, "uint8_t *dst_p,")?;
        code_output!(code, IDT1, "const struct {} *src_p,", struct_name)?;
        code_output!(code, IDT1, "size_t size);\n")?;

        code_output!(code, IDT0, "/**")?;
        code_output!(code, IDT0, " * Unpack message {}.", msg.message.name)?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @param[out] dst_p Object to unpack the message into.")?;
        code_output!(code, IDT0, " * @param[in] src_p Message to unpack.")?;
        code_output!(code, IDT0, " * @param[in] size Size of src_p.")?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @return zero(0) or negative error code.")?;
        code_output!(code, IDT0, " */")?;
        code_output!(code, IDT0, "int {}_unpack(", prefix)?;
        code_output!(code, IDT1, "struct {} *dst_p,", struct_name)?;
        code_output!(code, IDT1, "const uint8_t *src_p,")?;
        code_output!(code, IDT1, "size_t size);\n")?;

        code_output!(code, IDT0, "/**")?;
        code_output!(code, IDT0, " * Init message fields to default values from {}.", msg.message.name)?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @param[in] msg_p Message to init.")?;
        code_output!(code, IDT0, " *")?;
        code_output!(code, IDT0, " * @return zero(0) on success or (-1) in case of nullptr argument.")?;
        code_output!(code, IDT0, " */")?;
        code_output!(code, IDT0, "int {}_init(struct {} *msg_p);\n", prefix, struct_name)?;

        for sig in &msg.signals {
            let sig_prefix = format!("{prefix}_{}", sig.snake_name);
            if self.options.floating_point_numbers {
                code_output!(code, IDT0, "/**")?;
                code_output!(code, IDT0, " * Encode given signal by applying scaling and offset.")?;
                code_output!(code, IDT0, " */")?;
                code_output!(code, IDT0, "{} {}_encode({} value);\n", sig.type_name(), sig_prefix, self.float_type())?;
                code_output!(code, IDT0, "/**")?;
                code_output!(code, IDT0, " * Decode given signal by applying scaling and offset.")?;
                code_output!(code, IDT0, " */")?;
                code_output!(code, IDT0, "{} {}_decode({} value);\n", self.float_type(), sig_prefix, sig.type_name())?;
            }
            code_output!(code, IDT0, "/**")?;
            code_output!(code, IDT0, " * Check that given signal is in allowed range.")?;
            code_output!(code, IDT0, " */")?;
            code_output!(code, IDT0, "bool {}_is_in_range({} value);\n", sig_prefix, sig.type_name())?;
        }
        Ok(())
    }

    fn gen_header(&self, header_name: &str) -> Result<String, CgenError> {
        let mut code = CodeText::default();
        let guard = format!("{}_H", self.database_name.to_uppercase());

        self.gen_banner(&mut code, header_name)?;
        code.output(IDT0, format!("#ifndef {guard}"))?;
        code.output(IDT0, format!("#define {guard}\n"))?;
        code.output(IDT0, "#ifdef __cplusplus")?;
        code.output(IDT0, "extern \"C\" {")?;
        code.output(IDT0, "#endif\n")?;
        code.output(IDT0, "#include <stdint.h>")?;
        code.output(IDT0, "#include <stdbool.h>")?;
        code.output(IDT0, "#include <stddef.h>\n")?;
        code.output(IDT0, "#ifndef EINVAL")?;
        code.output(IDT0, "#    define EINVAL 22")?;
        code.output(IDT0, "#endif\n")?;

        self.gen_defines(&mut code)?;
        for msg in &self.messages {
            self.gen_struct(&mut code, msg)?;
        }
        for msg in &self.messages {
            self.gen_prototypes(&mut code, msg)?;
        }

        code.output(IDT0, "#ifdef __cplusplus")?;
        code.output(IDT0, "}")?;
        code.output(IDT0, "#endif\n")?;
        code.output(IDT0, "#endif")?;
        Ok(code.into_string())
    }

    fn gen_helpers(&self, code: &mut CodeText) -> fmt::Result {
        let mut pack: BTreeSet<(u64, ShiftDirection)> = BTreeSet::new();
        let mut unpack: BTreeSet<(u64, ShiftDirection)> = BTreeSet::new();
        for msg in &self.messages {
            for sig in &msg.signals {
                for segment in sig.segments(false) {
                    pack.insert((sig.type_length, segment.direction));
                }
                for segment in sig.segments(true) {
                    unpack.insert((sig.type_length, segment.direction));
                }
            }
        }

        for (length, direction) in pack {
            let operator = if direction == ShiftDirection::Left { "<<" } else { ">>" };
            code_output!(code, IDT0, "static inline uint8_t pack_{}_shift_u{}(", direction.as_str(), length)?;
            code_output!(code, IDT1, "uint{}_t value,", length)?;
            code_output!(code, IDT1, "uint8_t shift,")?;
            code_output!(code, IDT1, "uint8_t mask)")?;
            code_output!(code, IDT0, "{")?;
            code_output!(code, IDT1, "return (uint8_t)((uint8_t)(value {} shift) & mask);", operator)?;
            code_output!(code, IDT0, "}\n")?;
        }

        for (length, direction) in unpack {
            let operator = if direction == ShiftDirection::Left { "<<" } else { ">>" };
            code_output!(code, IDT0, "static inline uint{0}_t unpack_{1}_shift_u{0}(", length, direction.as_str())?;
            code_output!(code, IDT1, "uint8_t value,")?;
            code_output!(code, IDT1, "uint8_t shift,")?;
            code_output!(code, IDT1, "uint8_t mask)")?;
            code_output!(code, IDT0, "{")?;
            code_output!(
                code,
                IDT1,
                "return (uint{0}_t)((uint{0}_t)(value & mask) {1} shift);",
                length,
                operator
            )?;
            code_output!(code, IDT0, "}\n")?;
        }
        Ok(())
    }

    fn needs_conversion(sig: &CSignal) -> bool {
        sig.is_float || sig.is_signed()
    }

    fn gen_pack_signal(code: &mut CodeText, indent: &str, sig: &CSignal) -> fmt::Result {
        let name = &sig.snake_name;
        let variable = if sig.is_float {
            code_output!(code, indent, "memcpy(&{0}, &src_p->{0}, sizeof({0}));", name)?;
            name.clone()
        } else if sig.is_signed() {
            code_output!(code, indent, "{0} = (uint{1}_t)src_p->{0};", name, sig.type_length)?;
            name.clone()
        } else {
            format!("src_p->{name}")
        };
        for segment in sig.segments(false) {
            code_output!(
                code,
                indent,
                "dst_p[{}] |= pack_{}_shift_u{}({}, {}u, 0x{:02x}u);",
                segment.index,
                segment.direction.as_str(),
                sig.type_length,
                variable,
                segment.shift,
                segment.mask
            )?;
        }
        Ok(())
    }

    fn gen_unpack_signal(code: &mut CodeText, indent: &str, sig: &CSignal) -> fmt::Result {
        let name = &sig.snake_name;
        let variable = if Self::needs_conversion(sig) { name.clone() } else { format!("dst_p->{name}") };
        for (idx, segment) in sig.segments(true).iter().enumerate() {
            code_output!(
                code,
                indent,
                "{} {} unpack_{}_shift_u{}(src_p[{}], {}u, 0x{:02x}u);",
                variable,
                if idx == 0 { "=" } else { "|=" },
                segment.direction.as_str(),
                sig.type_length,
                segment.index,
                segment.shift,
                segment.mask
            )?;
        }
        if let Some(mask) = sig.sign_extension_mask() {
            let suffix = sig.conversion_suffix();
            code_output!(
                code,
                indent,
                "if (({} & (1{} << {}u)) != 0{}) {{",
                variable,
                suffix,
                sig.signal.size - 1,
                suffix
            )?;
            code_output!(code, indent, "    {} |= 0x{:x}{};", variable, mask, suffix)?;
            code_output!(code, indent, "}")?;
        }
        if sig.is_float {
            code_output!(code, indent, "memcpy(&dst_p->{0}, &{0}, sizeof(dst_p->{0}));", name)?;
        } else if sig.is_signed() {
            code_output!(code, indent, "dst_p->{0} = ({1}){0};", name, sig.type_name())?;
        }
        Ok(())
    }

    fn gen_pack(&self, code: &mut CodeText, msg: &CMessage) -> fmt::Result {
        let size = msg.message.size;
        code_output!(code, IDT0, "int {}_pack(", self.func_prefix(msg))?;
        code_output!(code, IDT1, "uint8_t *dst_p,")?;
        code_output!(code, IDT1, "const struct {} *src_p,", self.struct_name(msg))?;
        code_output!(code, IDT1, "size_t size)")?;
        code_output!(code, IDT0, "{")?;

        let conversions: Vec<&CSignal> = msg.signals.iter().filter(|sig| Self::needs_conversion(sig)).collect();
        for sig in &conversions {
            code_output!(code, IDT1, "uint{}_t {};", sig.type_length, sig.snake_name)?;
        }
        if !conversions.is_empty() {
            code_output!(code, IDT0, "")?;
        }

        if size > 0 {
            code_output!(code, IDT1, "if (size < {}u) {{", size)?;
            code_output!(code, IDT2, "return (-EINVAL);")?;
            code_output!(code, IDT1, "}\n")?;
            code_output!(code, IDT1, "memset(&dst_p[0], 0, {});\n", size)?;
        } else {
            code_output!(code, IDT1, "(void)dst_p;")?;
            code_output!(code, IDT1, "(void)size;")?;
        }
        if msg.signals.is_empty() {
            code_output!(code, IDT1, "(void)src_p;\n")?;
        }

        for sig in msg.plain_signals() {
            Self::gen_pack_signal(code, IDT1, sig)?;
        }

        if let Some(mux) = msg.multiplexor() {
            code_output!(code, IDT0, "")?;
            code_output!(code, IDT1, "switch (src_p->{}) {{", mux.snake_name)?;
            for (value, signals) in msg.multiplexed_signals() {
                code_output!(code, IDT0, "")?;
                code_output!(code, IDT1, "case {}:", value)?;
                for sig in signals {
                    Self::gen_pack_signal(code, IDT2, sig)?;
                }
                code_output!(code, IDT2, "break;")?;
            }
            code_output!(code, IDT0, "")?;
            code_output!(code, IDT1, "default:")?;
            code_output!(code, IDT2, "break;")?;
            code_output!(code, IDT1, "}")?;
        }

        code_output!(code, IDT0, "")?;
        code_output!(code, IDT1, "return ({});", size)?;
        code_output!(code, IDT0, "}\n")?;
        Ok(())
    }

    fn gen_unpack(&self, code: &mut CodeText, msg: &CMessage) -> fmt::Result {
        let size = msg.message.size;
        code_output!(code, IDT0, "int {}_unpack(", self.func_prefix(msg))?;
        code_output!(code, IDT1, "struct {} *dst_p,", self.struct_name(msg))?;
        code_output!(code, IDT1, "const uint8_t *src_p,")?;
        code_output!(code, IDT1, "size_t size)")?;
        code_output!(code, IDT0, "{")?;

        let conversions: Vec<&CSignal> = msg.signals.iter().filter(|sig| Self::needs_conversion(sig)).collect();
        for sig in &conversions {
            code_output!(code, IDT1, "uint{}_t {};", sig.type_length, sig.snake_name)?;
        }
        if !conversions.is_empty() {
            code_output!(code, IDT0, "")?;
        }

        if size > 0 {
            code_output!(code, IDT1, "if (size < {}u) {{", size)?;
            code_output!(code, IDT2, "return (-EINVAL);")?;
            code_output!(code, IDT1, "}\n")?;
        } else {
            code_output!(code, IDT1, "(void)size;")?;
        }
        if msg.signals.is_empty() {
            code_output!(code, IDT1, "(void)dst_p;")?;
            code_output!(code, IDT1, "(void)src_p;\n")?;
        }

        for sig in msg.plain_signals() {
            Self::gen_unpack_signal(code, IDT1, sig)?;
        }

        if let Some(mux) = msg.multiplexor() {
            code_output!(code, IDT0, "")?;
            code_output!(code, IDT1, "switch (dst_p->{}) {{", mux.snake_name)?;
            for (value, signals) in msg.multiplexed_signals() {
                code_output!(code, IDT0, "")?;
                code_output!(code, IDT1, "case {}:", value)?;
                for sig in signals {
                    Self::gen_unpack_signal(code, IDT2, sig)?;
                }
                code_output!(code, IDT2, "break;")?;
            }
            code_output!(code, IDT0, "")?;
            code_output!(code, IDT1, "default:")?;
            code_output!(code, IDT2, "break;")?;
            code_output!(code, IDT1, "}")?;
        }

        code_output!(code, IDT0, "")?;
        code_output!(code, IDT1, "return (0);")?;
        code_output!(code, IDT0, "}\n")?;
        Ok(())
    }

    fn gen_init(&self, code: &mut CodeText, msg: &CMessage) -> fmt::Result {
        let struct_name = self.struct_name(msg);
        code_output!(code, IDT0, "int {}_init(struct {} *msg_p)", self.func_prefix(msg), struct_name)?;
        code_output!(code, IDT0, "{")?;
        code_output!(code, IDT1, "if (msg_p == NULL) return -1;\n")?;
        code_output!(code, IDT1, "memset(msg_p, 0, sizeof(struct {}));\n", struct_name)?;
        code_output!(code, IDT1, "return 0;")?;
        code_output!(code, IDT0, "}\n")?;
        Ok(())
    }

    fn gen_signal_functions(&self, code: &mut CodeText, msg: &CMessage, sig: &CSignal) -> fmt::Result {
        let signal = sig.signal;
        let prefix = format!("{}_{}", self.func_prefix(msg), sig.snake_name);
        let type_name = sig.type_name();
        let float_type = self.float_type();

        if self.options.floating_point_numbers {
            code_output!(code, IDT0, "{} {}_encode({} value)", type_name, prefix, float_type)?;
            code_output!(code, IDT0, "{")?;
            if signal.offset == 0.0 {
                code_output!(code, IDT1, "return ({})(value / {});", type_name, self.float(signal.factor))?;
            } else {
                code_output!(
                    code,
                    IDT1,
                    "return ({})((value - {}) / {});",
                    type_name,
                    self.float(signal.offset),
                    self.float(signal.factor)
                )?;
            }
            code_output!(code, IDT0, "}\n")?;

            code_output!(code, IDT0, "{} {}_decode({} value)", float_type, prefix, type_name)?;
            code_output!(code, IDT0, "{")?;
            if signal.offset == 0.0 {
                code_output!(code, IDT1, "return (({})value * {});", float_type, self.float(signal.factor))?;
            } else {
                code_output!(
                    code,
                    IDT1,
                    "return (({})value * {}) + {};",
                    float_type,
                    self.float(signal.factor),
                    self.float(signal.offset)
                )?;
            }
            code_output!(code, IDT0, "}\n")?;
        }

        code_output!(code, IDT0, "bool {}_is_in_range({} value)", prefix, type_name)?;
        code_output!(code, IDT0, "{")?;
        let checks = sig.range_checks();
        if checks.is_empty() {
            code_output!(code, IDT1, "(void)value;\n")?;
            code_output!(code, IDT1, "return (true);")?;
        } else {
            code_output!(code, IDT1, "return ({});", checks.join(" && "))?;
        }
        code_output!(code, IDT0, "}\n")?;
        Ok(())
    }

    fn gen_source(&self, header_name: &str, source_name: &str) -> Result<String, CgenError> {
        let mut code = CodeText::default();

        self.gen_banner(&mut code, source_name)?;
        code.output(IDT0, "#include <string.h>\n")?;
        code.output(IDT0, format!("#include \"{header_name}\"\n"))?;

        self.gen_helpers(&mut code)?;
        for msg in &self.messages {
            log::debug!("generating C code for message:{} id:{:#x}", msg.message.name, msg.message.id.raw());
            self.gen_pack(&mut code, msg)?;
            self.gen_unpack(&mut code, msg)?;
            self.gen_init(&mut code, msg)?;
            for sig in &msg.signals {
                self.gen_signal_functions(&mut code, msg, sig)?;
            }
        }
        Ok(code.into_string())
    }
}

/// Generate `(header, source)` C text for every message of the database.
///
/// # Errors
/// `CgenError::SignalLayout` when a signal does not fit its message.
pub fn generate(
    database: &DbcObject,
    database_name: &str,
    header_name: &str,
    source_name: &str,
    options: &CGenOptions,
) -> Result<(String, String), CgenError> {
    let mut messages = database
        .messages
        .iter()
        .map(|message| CMessage::new(database, message))
        .collect::<Result<Vec<_>, _>>()?;
    messages.sort_by_key(|msg| (msg.message.id.frame_id(), msg.message.id.raw()));

    let cgen = CGen {
        database_name,
        options,
        date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        messages,
    };

    let header = cgen.gen_header(header_name)?;
    let source = cgen.gen_source(header_name, source_name)?;
    Ok((header, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_literals() {
        assert_eq!(c_float_literal(1.0, false), "1.0");
        assert_eq!(c_float_literal(0.1, false), "0.1");
        assert_eq!(c_float_literal(-40.0, true), "-40.0f");
    }

    #[test]
    fn code_text_indent() {
        let mut code = CodeText::default();
        code_output!(code, IDT1, "int {};", "x").expect("write");
        code_output!(code, IDT2, "}").expect("write");
        assert_eq!(code.into_string(), "    int x;\n        }\n");
    }
}
