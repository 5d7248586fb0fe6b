use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::ConfigError;
use crate::filter::{
    Access, BigDecimalFilter, BigIntegerFilter, DecimalFilter, Existence, IntegerFilter,
    PathFilter, PathKind, RegexFilter, SetFilter, SharedFilter,
};
use crate::plugin::{Factories, Node};
use crate::rule::{
    And, ExactlyOneOf, Not, OnlyKnownFlags, OnlyKnownOptions, Or, RequiredFields, Rule, SharedRule,
    Xor,
};

pub(super) fn install(factories: Factories) -> Factories {
    factories
        .register_filter("integer", integer)
        .register_filter("big-integer", big_integer)
        .register_filter("decimal", decimal)
        .register_filter("big-decimal", big_decimal)
        .register_filter("regex", regex)
        .register_filter("set", set)
        .register_filter("path", path)
        .register_rule("and", |factories, node| {
            composite(factories, node, And::new(), And::shared, |rule, text| {
                rule.message(text)
            })
        })
        .register_rule("or", |factories, node| {
            composite(factories, node, Or::new(), Or::shared, |rule, text| {
                rule.message(text)
            })
        })
        .register_rule("xor", |factories, node| {
            composite(factories, node, Xor::new(), Xor::shared, |rule, text| {
                rule.message(text)
            })
        })
        .register_rule("not", |factories, node| {
            composite(factories, node, Not::new(), Not::shared, |rule, text| {
                rule.message(text)
            })
        })
        .register_rule("required", |_, node| {
            let mut rule = RequiredFields::new(fields(node)?);

            if let Some(message) = node.text("message") {
                rule = rule.message(message);
            }

            Ok(Arc::new(rule) as SharedRule)
        })
        .register_rule("exactly-one", |_, node| {
            let mut rule = ExactlyOneOf::new(fields(node)?);

            if let Some(message) = node.text("message") {
                rule = rule.message(message);
            }

            Ok(Arc::new(rule) as SharedRule)
        })
        .register_rule("only-known-flags", |_, node| {
            let mut rule = OnlyKnownFlags::new();

            if let Some(message) = node.text("message") {
                rule = rule.message(message);
            }

            Ok(Arc::new(rule) as SharedRule)
        })
        .register_rule("only-known-options", |_, node| {
            let mut rule = OnlyKnownOptions::new();

            if let Some(message) = node.text("message") {
                rule = rule.message(message);
            }

            Ok(Arc::new(rule) as SharedRule)
        })
}

fn integer(node: &Node) -> Result<SharedFilter, ConfigError> {
    let mut filter = IntegerFilter::new();

    if let Some(radix) = node.parse::<u32>("radix")? {
        filter = filter.radix(radix)?;
    }

    // Bounds are written in the filter's radix.
    for (name, bound) in [("min", true), ("max", false)] {
        if let Some(raw) = node.text(name) {
            let value = i64::from_str_radix(raw.trim(), filter.base()).map_err(|error| {
                ConfigError::InvalidAttribute {
                    name: name.to_string(),
                    reason: format!("'{raw}': {error}"),
                }
            })?;
            filter = if bound {
                filter.min(value)
            } else {
                filter.max(value)
            };
        }
    }

    Ok(Arc::new(filter))
}

fn big_integer(node: &Node) -> Result<SharedFilter, ConfigError> {
    let mut filter = BigIntegerFilter::new();

    if let Some(radix) = node.parse::<u32>("radix")? {
        filter = filter.radix(radix)?;
    }

    if let Some(min) = node.parse::<BigInt>("min")? {
        filter = filter.min(min);
    }

    if let Some(max) = node.parse::<BigInt>("max")? {
        filter = filter.max(max);
    }

    Ok(Arc::new(filter))
}

fn decimal(node: &Node) -> Result<SharedFilter, ConfigError> {
    let mut filter = DecimalFilter::new();

    if let Some(min) = node.parse::<f64>("min")? {
        filter = filter.min(min);
    }

    if let Some(max) = node.parse::<f64>("max")? {
        filter = filter.max(max);
    }

    Ok(Arc::new(filter))
}

fn big_decimal(node: &Node) -> Result<SharedFilter, ConfigError> {
    let mut filter = BigDecimalFilter::new();

    if let Some(min) = node.parse::<BigDecimal>("min")? {
        filter = filter.min(min);
    }

    if let Some(max) = node.parse::<BigDecimal>("max")? {
        filter = filter.max(max);
    }

    Ok(Arc::new(filter))
}

fn regex(node: &Node) -> Result<SharedFilter, ConfigError> {
    let pattern = node.require("pattern")?;
    let group = node.parse::<usize>("group")?.unwrap_or(0);
    Ok(Arc::new(RegexFilter::with_group(pattern, group)?))
}

fn set(node: &Node) -> Result<SharedFilter, ConfigError> {
    let case_sensitive = node.switch("case-sensitive", true)?;
    Ok(Arc::new(SetFilter::new(node.list("values"), case_sensitive)?))
}

fn path(node: &Node) -> Result<SharedFilter, ConfigError> {
    let mut filter = PathFilter::new();

    if let Some(existence) = node.text("existence") {
        filter = filter.existence(match existence {
            "must-exist" => Existence::MustExist,
            "must-not-exist" => Existence::MustNotExist,
            "irrelevant" => Existence::Irrelevant,
            other => return Err(invalid("existence", other)),
        });
    }

    if let Some(kind) = node.text("kind") {
        filter = filter.kind(match kind {
            "file" => PathKind::File,
            "directory" => PathKind::Directory,
            "irrelevant" => PathKind::Irrelevant,
            other => return Err(invalid("kind", other)),
        });
    }

    if let Some(access) = node.text("access") {
        let mut required = Access::none();

        for c in access.chars() {
            required = match c {
                'r' => required.read(),
                'w' => required.write(),
                'x' => required.execute(),
                '-' => required,
                _ => return Err(invalid("access", access)),
            };
        }

        filter = filter.access(required);
    }

    if let Some(extension) = node.text("extension") {
        filter = filter.extension(extension);
    }

    Ok(Arc::new(filter))
}

fn invalid(name: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidAttribute {
        name: name.to_string(),
        reason: format!("'{raw}' is not a recognized value."),
    }
}

fn fields(node: &Node) -> Result<Vec<String>, ConfigError> {
    if node.fields().is_empty() {
        Err(ConfigError::InvalidRule(format!(
            "'{}' must reference at least one field.",
            node.kind()
        )))
    } else {
        Ok(node.fields().to_vec())
    }
}

fn composite<R>(
    factories: &Factories,
    node: &Node,
    mut rule: R,
    add: fn(R, SharedRule) -> R,
    message: fn(R, String) -> R,
) -> Result<SharedRule, ConfigError>
where
    R: Rule + 'static,
{
    if node.children().is_empty() {
        return Err(ConfigError::InvalidRule(format!(
            "'{}' must contain at least one rule.",
            node.kind()
        )));
    }

    for child in node.children() {
        rule = add(rule, factories.build_rule(child)?);
    }

    if let Some(text) = node.text("message") {
        rule = message(rule, text.to_string());
    }

    Ok(Arc::new(rule))
}
