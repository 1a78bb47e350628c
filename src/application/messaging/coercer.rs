//! Argument coercion - maps raw tokens onto a descriptor's parameter shape

use thiserror::Error;

use crate::domain::entities::{ArgValue, Args, ParamKind};

/// Why a token list doesn't fit a parameter shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("missing {kind} argument at position {index}")]
    MissingToken { index: usize, kind: ParamKind },

    #[error("'{token}' at position {index} is not an integer")]
    NotAnInteger { index: usize, token: String },

    #[error("'{token}' at position {index} is not a number")]
    NotAFloat { index: usize, token: String },
}

/// Coerce `tokens` positionally into `params`
///
/// A string tail swallows every remaining token, possibly none. Tokens past
/// the last slot of a shape without a tail are ignored.
pub fn coerce(params: &[ParamKind], tokens: &[String]) -> Result<Args, CoercionError> {
    let mut values = Vec::with_capacity(params.len());

    for (index, kind) in params.iter().copied().enumerate() {
        let value = match kind {
            ParamKind::StringTail => {
                let rest = tokens.get(index..).unwrap_or_default();
                values.push(ArgValue::StringTail(rest.to_vec()));
                break;
            }
            ParamKind::Integer => {
                let token = token_at(tokens, index, kind)?;
                token
                    .parse::<i32>()
                    .map(ArgValue::Integer)
                    .map_err(|_| CoercionError::NotAnInteger {
                        index,
                        token: token.clone(),
                    })?
            }
            ParamKind::Float => {
                let token = token_at(tokens, index, kind)?;
                match token.parse::<f32>() {
                    Ok(v) if v.is_finite() => ArgValue::Float(v),
                    _ => {
                        return Err(CoercionError::NotAFloat {
                            index,
                            token: token.clone(),
                        })
                    }
                }
            }
            ParamKind::String => ArgValue::String(token_at(tokens, index, kind)?.clone()),
        };
        values.push(value);
    }

    Ok(Args::new(values))
}

fn token_at(tokens: &[String], index: usize, kind: ParamKind) -> Result<&String, CoercionError> {
    tokens
        .get(index)
        .ok_or(CoercionError::MissingToken { index, kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn typed_slots() {
        let args = coerce(
            &[ParamKind::String, ParamKind::Integer, ParamKind::Float],
            &toks("bob 3 2.5"),
        )
        .unwrap();
        assert_eq!(
            args.values(),
            &[
                ArgValue::String("bob".into()),
                ArgValue::Integer(3),
                ArgValue::Float(2.5)
            ]
        );
    }

    #[test]
    fn bad_numbers_fail_the_shape() {
        assert_eq!(
            coerce(&[ParamKind::Integer], &toks("three")),
            Err(CoercionError::NotAnInteger {
                index: 0,
                token: "three".into()
            })
        );
        assert!(coerce(&[ParamKind::Integer], &toks("2.5")).is_err());
        assert!(coerce(&[ParamKind::Float], &toks("fast")).is_err());
        assert!(coerce(&[ParamKind::Float], &toks("NaN")).is_err());
        assert!(coerce(&[ParamKind::Float], &toks("4")).is_ok());
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(
            coerce(&[ParamKind::String, ParamKind::String], &toks("only")),
            Err(CoercionError::MissingToken {
                index: 1,
                kind: ParamKind::String
            })
        );
    }

    #[test]
    fn empty_tail() {
        let args = coerce(&[ParamKind::String, ParamKind::StringTail], &toks("bob")).unwrap();
        assert_eq!(args.tail(1).unwrap(), &[] as &[String]);
    }

    #[test]
    fn tail_keeps_order_and_leaves_earlier_slots_alone() {
        let args = coerce(
            &[ParamKind::String, ParamKind::Integer, ParamKind::StringTail],
            &toks("bob 2 the quick brown fox"),
        )
        .unwrap();
        assert_eq!(args.string(0).unwrap(), "bob");
        assert_eq!(args.int(1).unwrap(), 2);
        assert_eq!(args.tail(2).unwrap(), toks("the quick brown fox").as_slice());
    }

    #[test]
    fn surplus_tokens_are_ignored() {
        let args = coerce(&[ParamKind::String], &toks("bob alice")).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.string(0).unwrap(), "bob");
    }

    #[test]
    fn zero_slots_accept_anything() {
        assert!(coerce(&[], &[]).unwrap().is_empty());
        assert!(coerce(&[], &toks("extra")).unwrap().is_empty());
    }
}
