//! Regular expression translations
//!
//! Translates: IsMatch, Replace, Count, Split. Options must be a constant
//! [`RegexOptions`] value; non-constant options and options with no
//! KingbaseES equivalent leave the operation untranslated.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::{HostType, HostValue};
use std::ops::BitOr;

use super::{constant_int, constant_str};
use crate::{Domain, Operation, Translator};

/// Host regular expression option flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegexOptions(u32);

impl RegexOptions {
    pub const NONE: Self = Self(0);
    pub const IGNORE_CASE: Self = Self(1);
    pub const MULTILINE: Self = Self(2);
    pub const EXPLICIT_CAPTURE: Self = Self(4);
    pub const COMPILED: Self = Self(8);
    pub const SINGLELINE: Self = Self(16);
    pub const IGNORE_PATTERN_WHITESPACE: Self = Self(32);
    pub const RIGHT_TO_LEFT: Self = Self(64);
    pub const ECMA_SCRIPT: Self = Self(256);
    pub const CULTURE_INVARIANT: Self = Self(512);
    pub const NON_BACKTRACKING: Self = Self(1024);

    const UNSUPPORTED: Self = Self(
        Self::EXPLICIT_CAPTURE.0 | Self::RIGHT_TO_LEFT.0 | Self::ECMA_SCRIPT.0 | Self::NON_BACKTRACKING.0,
    );

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if every set flag has a KingbaseES equivalent
    pub const fn is_supported(self) -> bool {
        self.0 & Self::UNSUPPORTED.0 == 0
    }

    /// Embedded ARE flag letters, excluding case sensitivity
    ///
    /// Without `SINGLELINE` a dot must not match a newline, so partial
    /// newline-sensitive matching (`p`) is the default.
    pub fn flag_letters(self) -> String {
        let mut flags = String::new();
        match (self.contains(Self::MULTILINE), self.contains(Self::SINGLELINE)) {
            (false, false) => flags.push('p'),
            (true, false) => flags.push('n'),
            (true, true) => flags.push('w'),
            (false, true) => {}
        }
        if self.contains(Self::IGNORE_PATTERN_WHITESPACE) {
            flags.push('x');
        }
        flags
    }
}

impl BitOr for RegexOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<RegexOptions> for HostValue {
    fn from(options: RegexOptions) -> Self {
        HostValue::Int32(options.0 as i32)
    }
}

pub struct RegexTranslator {
    factory: SqlExpressionFactory,
}

impl RegexTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    /// Read constant options; `None` declines the translation
    fn options(args: &[SqlExpression], arity_without_options: usize) -> Option<RegexOptions> {
        match args.get(arity_without_options) {
            None => Some(RegexOptions::NONE),
            Some(options) => {
                let bits = u32::try_from(constant_int(options)?).ok()?;
                let options = RegexOptions::from_bits(bits);
                options.is_supported().then_some(options)
            }
        }
    }

    /// Pattern with the embedded options prefix `(?flags)`
    fn prefixed_pattern(&self, pattern: &SqlExpression, options: RegexOptions) -> Result<SqlExpression> {
        let flags = options.flag_letters();
        if flags.is_empty() {
            return Ok(pattern.clone());
        }
        let prefix = format!("(?{})", flags);
        if let Some(text) = constant_str(pattern) {
            return Ok(self.factory.constant(HostValue::string(format!("{}{}", prefix, text))));
        }
        self.factory.binary(
            SqlOperator::Concat,
            self.factory.constant(HostValue::string(prefix)),
            pattern.clone(),
            &[true, true],
            HostType::String,
            None,
        )
    }

    fn flags_constant(&self, leading: &str, options: RegexOptions) -> SqlExpression {
        let mut flags = leading.to_string();
        if options.contains(RegexOptions::IGNORE_CASE) {
            flags.push('i');
        }
        flags.push_str(&options.flag_letters());
        self.factory.constant(HostValue::string(flags))
    }

    fn is_match(&self, input: &SqlExpression, pattern: &SqlExpression, options: RegexOptions) -> Result<SqlExpression> {
        let op = if options.contains(RegexOptions::IGNORE_CASE) {
            SqlOperator::RegexMatchCaseInsensitive
        } else {
            SqlOperator::RegexMatch
        };
        let pattern = self.prefixed_pattern(pattern, options)?;
        self.factory
            .binary(op, input.clone(), pattern, &[true, true], HostType::Bool, None)
    }
}

impl Translator for RegexTranslator {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Regex {
            return Ok(None);
        }
        let f = &self.factory;

        let expression = match (operation.name(), args) {
            ("IsMatch", [input, pattern, ..]) if args.len() <= 3 => {
                let Some(options) = Self::options(args, 2) else {
                    return Ok(None);
                };
                self.is_match(input, pattern, options)?
            }
            ("Replace", [input, pattern, replacement, ..]) if args.len() <= 4 => {
                let Some(options) = Self::options(args, 3) else {
                    return Ok(None);
                };
                let flags = self.flags_constant("g", options);
                f.function(
                    "regexp_replace",
                    vec![input.clone(), pattern.clone(), replacement.clone(), flags],
                    &[true, true, true, true],
                    HostType::String,
                    None,
                )?
            }
            ("Count", [input, pattern, ..]) if args.len() <= 3 => {
                let Some(options) = Self::options(args, 2) else {
                    return Ok(None);
                };
                let flags = self.flags_constant("", options);
                f.function(
                    "regexp_count",
                    vec![input.clone(), pattern.clone(), f.constant(HostValue::Int32(1)), flags],
                    &[true, true, true, true],
                    HostType::Int32,
                    None,
                )?
            }
            ("Split", [input, pattern, ..]) if args.len() <= 3 => {
                let Some(options) = Self::options(args, 2) else {
                    return Ok(None);
                };
                let flags = self.flags_constant("", options);
                f.function(
                    "regexp_split_to_array",
                    vec![input.clone(), pattern.clone(), flags],
                    &[true, true, true],
                    HostType::array(HostType::String),
                    None,
                )?
            }
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case(RegexOptions::NONE, "p")]
    #[case(RegexOptions::MULTILINE, "n")]
    #[case(RegexOptions::SINGLELINE, "")]
    #[case(RegexOptions::MULTILINE | RegexOptions::SINGLELINE, "w")]
    #[case(RegexOptions::SINGLELINE | RegexOptions::IGNORE_PATTERN_WHITESPACE, "x")]
    fn test_flag_letters(#[case] options: RegexOptions, #[case] expected: &str) {
        assert_eq!(options.flag_letters(), expected);
    }

    #[test]
    fn test_unsupported_flags() {
        assert!(!RegexOptions::RIGHT_TO_LEFT.is_supported());
        assert!(!(RegexOptions::IGNORE_CASE | RegexOptions::ECMA_SCRIPT).is_supported());
        assert!((RegexOptions::IGNORE_CASE | RegexOptions::COMPILED).is_supported());
    }

    #[test]
    fn test_replace_flags() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = RegexTranslator::new(factory.clone());
        let input = SqlExpression::column(None, "body", false, HostType::String, None);
        let args = [
            input,
            factory.constant(HostValue::string("a+")),
            factory.constant(HostValue::string("b")),
            factory.constant(RegexOptions::IGNORE_CASE.into()),
        ];
        let result = t
            .translate(&Operation::method(Domain::Regex, "Replace", 4), &args)
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "regexp_replace(body, 'a+', 'b', 'gip')");
    }
}
