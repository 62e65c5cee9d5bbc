//! Single-pass token parser.
//!
//! The parser walks the token list once, left to right, with no
//! backtracking. It has two states: [`ParserState::Consuming`] while tokens
//! remain, then [`ParserState::Validating`] once they run out. Validation is
//! terminal and is where missing required slots are reported.
//!
//! Token rules while consuming:
//!
//! - `-name` / `--name` selects a flag by alias; `--name=value` carries its
//!   value inline.
//! - A presence flag takes no value token and becomes `true`.
//! - Any other flag consumes the next token verbatim as its value, even when
//!   that token starts with `-`.
//! - A bare `--` ends flag recognition; a bare `-` is positional.
//! - Everything else fills the next positional slot. Past the last fixed
//!   slot, tokens go to the repeating slot, or are dropped when there is none.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::Schema;
use crate::Value;
use crate::error::{ParseError, Result};
use crate::schema::strip_marker;

/// Parse-time switches.
///
/// # Examples
///
/// ```
/// use argschema_core::ParseOptions;
///
/// let options = ParseOptions::default();
/// assert!(!options.allow_incomplete);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Skip required-flag and required-positional checks. Conversion errors
    /// and unknown flags are reported regardless.
    pub allow_incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Consuming,
    Validating,
}

/// Parser bound to one schema for one pass.
///
/// Most callers go through [`Schema::parse`]; this type is exposed for
/// callers that want to drive a parse from an iterator.
#[derive(Debug)]
pub struct Parser<'s> {
    schema: &'s mut Schema,
    options: ParseOptions,
    state: ParserState,
    next_positional: usize,
    flags_ended: bool,
}

impl<'s> Parser<'s> {
    pub fn new(schema: &'s mut Schema, options: ParseOptions) -> Self {
        Self {
            schema,
            options,
            state: ParserState::Consuming,
            next_positional: 0,
            flags_ended: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consumes every token, then validates.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`]; cells touched before it keep their
    /// new values.
    pub fn run<I>(mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            self.consume(token.as_ref(), &mut tokens)?;
        }

        self.state = ParserState::Validating;
        self.validate()
    }

    fn consume<S: AsRef<str>>(
        &mut self,
        token: &str,
        rest: &mut impl Iterator<Item = S>,
    ) -> Result<()> {
        if !self.flags_ended {
            if token == "--" {
                trace!("end of flags");
                self.flags_ended = true;
                return Ok(());
            }
            if token.len() > 1 && token.starts_with('-') {
                return self.consume_flag(token, rest);
            }
        }
        self.consume_positional(token)
    }

    fn consume_flag<S: AsRef<str>>(
        &mut self,
        token: &str,
        rest: &mut impl Iterator<Item = S>,
    ) -> Result<()> {
        let body = strip_marker(token);
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let Some(index) = self.schema.lookup_index(name) else {
            return Err(ParseError::UnknownFlag {
                token: token.to_string(),
            });
        };
        let slot = &mut self.schema.flags[index];

        if slot.presence && inline.is_none() {
            debug!(flag = token, "presence flag");
            slot.cell.assign(Value::Bool(true));
            return Ok(());
        }

        let value = match inline {
            Some(value) => value.to_string(),
            None => match rest.next() {
                Some(value) => value.as_ref().to_string(),
                None => {
                    return Err(ParseError::MissingFlagValue {
                        flag: slot.canonical_name(),
                    });
                }
            },
        };

        debug!(flag = token, value = %value, "flag value");
        slot.cell
            .set(&value)
            .map_err(|source| ParseError::Coercion {
                argument: slot.canonical_name(),
                source,
            })
    }

    fn consume_positional(&mut self, token: &str) -> Result<()> {
        let Some(slot) = self.schema.positionals.get_mut(self.next_positional) else {
            debug!(token, "discarding surplus positional");
            return Ok(());
        };

        trace!(positional = %slot.name, token, "positional value");
        slot.cell
            .set(token)
            .map_err(|source| ParseError::Coercion {
                argument: slot.name.clone(),
                source,
            })?;

        if !slot.repeating {
            self.next_positional += 1;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        debug_assert_eq!(self.state, ParserState::Validating);

        if self.options.allow_incomplete {
            debug!("incomplete parse allowed, skipping requirement checks");
            return Ok(());
        }

        if let Some(flag) = self
            .schema
            .flags
            .iter()
            .find(|flag| flag.required && !flag.cell.is_set())
        {
            return Err(ParseError::MissingRequiredFlag {
                flag: flag.canonical_name(),
            });
        }

        if let Some(slot) = self
            .schema
            .positionals
            .iter()
            .find(|slot| slot.required && !slot.cell.is_set())
        {
            let name = slot.name.clone();
            return Err(if slot.repeating {
                ParseError::MissingRepeatingPositional { name }
            } else {
                ParseError::MissingRequiredPositional { name }
            });
        }

        Ok(())
    }
}

/// Parses `tokens` (program name excluded) into `schema`.
///
/// Free-function form of [`Schema::parse`].
pub fn parse<S: AsRef<str>>(schema: &mut Schema, tokens: &[S], allow_incomplete: bool) -> Result<()> {
    schema.parse(tokens, allow_incomplete)
}
