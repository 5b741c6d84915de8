//! Parameter validators shared by tool definitions.
//!
//! Pure functions. An empty string or zero means "not supplied" and passes.

use super::error::ValidationError;

pub const VALID_SEVERITIES: &[i64] = &[1, 2, 3];
pub const VALID_CATES: &[&str] = &["prometheus", "host", "elasticsearch", "loki", "$all"];
pub const VALID_RULE_PRODS: &[&str] = &["host", "metric", "loki", "anomaly"];
pub const VALID_RECOVERED: &[i64] = &[-1, 0, 1];

pub type ValidationResult = Result<(), ValidationError>;

/// A relative window (`hours`) excludes absolute bounds, and absolute bounds
/// must be ordered.
pub fn validate_time_range(hours: i64, stime: i64, etime: i64) -> ValidationResult {
    if hours > 0 && (stime > 0 || etime > 0) {
        return Err(ValidationError::ExclusiveTimeRange);
    }
    if stime > 0 && etime > 0 && stime >= etime {
        return Err(ValidationError::InvertedTimeRange { stime, etime });
    }
    Ok(())
}

pub fn validate_pagination(limit: i64, page: i64) -> ValidationResult {
    if limit < 0 {
        return Err(ValidationError::Negative {
            field: "limit",
            value: limit,
        });
    }
    if page < 0 {
        return Err(ValidationError::Negative {
            field: "page",
            value: page,
        });
    }
    Ok(())
}

/// Comma-separated severities, each one of 1, 2, 3.
pub fn validate_severity(severity: &str) -> ValidationResult {
    if severity.is_empty() {
        return Ok(());
    }
    for item in severity.split(',') {
        let valid = item
            .trim()
            .parse::<i64>()
            .map(|sev| VALID_SEVERITIES.contains(&sev))
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::Severity(item.to_string()));
        }
    }
    Ok(())
}

pub fn validate_cate(cate: &str) -> ValidationResult {
    if cate.is_empty() || VALID_CATES.contains(&cate) {
        Ok(())
    } else {
        Err(ValidationError::Cate(cate.to_string()))
    }
}

/// Comma-separated product types.
pub fn validate_rule_prods(rule_prods: &str) -> ValidationResult {
    if rule_prods.is_empty() {
        return Ok(());
    }
    for item in rule_prods.split(',') {
        let prod = item.trim();
        if !VALID_RULE_PRODS.contains(&prod) {
            return Err(ValidationError::RuleProd(prod.to_string()));
        }
    }
    Ok(())
}

pub fn validate_is_recovered(is_recovered: i64) -> ValidationResult {
    if VALID_RECOVERED.contains(&is_recovered) {
        Ok(())
    } else {
        Err(ValidationError::IsRecovered(is_recovered))
    }
}

/// Mute window checks.
///
/// Only fixed-window mutes (`mute_time_type == 0`) are checked; periodic
/// windows are passed to the platform untouched.
pub fn validate_mute_window(mute_time_type: i64, btime: i64, etime: i64) -> ValidationResult {
    if mute_time_type != 0 {
        return Ok(());
    }
    if btime <= 0 || etime <= 0 {
        return Err(ValidationError::MuteWindowRequired);
    }
    if btime >= etime {
        return Err(ValidationError::MuteWindowInverted);
    }
    Ok(())
}

/// Identifier fields must be set to a positive value.
pub fn require_id(field: &'static str, value: i64) -> ValidationResult {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::MissingId(field))
    }
}

/// String identifiers must be non-blank; whitespace-only counts as missing.
pub fn require_non_empty(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}
