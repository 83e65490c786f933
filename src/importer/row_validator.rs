// ==========================================
// 工资档案管理 - 行校验器
// ==========================================
// 规则（按顺序，遇到第一个失败即返回）:
// 1. 四个字段均存在且 trim 后非空
// 2. 邮箱符合 local@domain 语法，domain 至少含一个点
// 3. 薪资为有限数值且非负
// 约束: 各行独立校验，不跨行保留状态；不做大小写归一
// ==========================================

use crate::domain::import::ValidatedRow;
use crate::importer::csv_parser::CsvRow;
use crate::importer::error::RowError;
use crate::importer::header_validator::{COMPANY_NAME, EMAIL_ADDRESS, EMPLOYEE_NAME, SALARY};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$"#,
    )
    .expect("email pattern is a valid regex")
});

/// 邮箱语法校验
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_PART_LEN => EMAIL_PATTERN.is_match(email),
        _ => false,
    }
}

/// 解析薪资：有限数值且非负
pub fn parse_salary(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // -0 归一为 0
    Some(if value == 0.0 { 0.0 } else { value })
}

/// 校验单行
pub fn validate_row(row: &CsvRow) -> Result<ValidatedRow, RowError> {
    let company_name = row.get(COMPANY_NAME).trim();
    let full_name = row.get(EMPLOYEE_NAME).trim();
    let email = row.get(EMAIL_ADDRESS).trim();
    let salary = row.get(SALARY).trim();

    if company_name.is_empty() || full_name.is_empty() || email.is_empty() || salary.is_empty() {
        return Err(RowError::MissingRequiredFields);
    }

    if !is_valid_email(email) {
        return Err(RowError::InvalidEmail(email.to_string()));
    }

    let salary_value =
        parse_salary(salary).ok_or_else(|| RowError::InvalidSalary(salary.to_string()))?;

    Ok(ValidatedRow {
        company_name: company_name.to_string(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        salary: salary_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(company: &str, name: &str, email: &str, salary: &str) -> CsvRow {
        let mut fields = HashMap::new();
        fields.insert(COMPANY_NAME.to_string(), company.to_string());
        fields.insert(EMPLOYEE_NAME.to_string(), name.to_string());
        fields.insert(EMAIL_ADDRESS.to_string(), email.to_string());
        fields.insert(SALARY.to_string(), salary.to_string());
        CsvRow {
            row_number: 2,
            fields,
        }
    }

    #[test]
    fn test_valid_row_is_trimmed() {
        let validated = validate_row(&row(" Acme ", " John Doe", "john@acme.com ", " 50000")).unwrap();
        assert_eq!(validated.company_name, "Acme");
        assert_eq!(validated.full_name, "John Doe");
        assert_eq!(validated.email, "john@acme.com");
        assert_eq!(validated.salary, 50000.0);
    }

    #[test]
    fn test_missing_fields_checked_first() {
        // 邮箱同样非法，但缺字段优先
        assert_eq!(
            validate_row(&row("Acme", "   ", "notanemail", "-1")),
            Err(RowError::MissingRequiredFields)
        );
        assert_eq!(
            validate_row(&row("Acme", "John", "john@acme.com", "")),
            Err(RowError::MissingRequiredFields)
        );

        let empty = CsvRow {
            row_number: 2,
            fields: HashMap::new(),
        };
        assert_eq!(validate_row(&empty), Err(RowError::MissingRequiredFields));
    }

    #[test]
    fn test_invalid_email_before_salary() {
        assert_eq!(
            validate_row(&row("Acme", "Invalid Email", "notanemail", "-5000")),
            Err(RowError::InvalidEmail("notanemail".to_string()))
        );
    }

    #[test]
    fn test_invalid_salary() {
        assert_eq!(
            validate_row(&row("Acme", "John", "john@acme.com", "-5000")),
            Err(RowError::InvalidSalary("-5000".to_string()))
        );
        assert_eq!(
            validate_row(&row("Acme", "John", "john@acme.com", "abc")),
            Err(RowError::InvalidSalary("abc".to_string()))
        );
    }

    #[test]
    fn test_email_grammar() {
        assert!(is_valid_email("john@acme.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john@@acme.com"));
        assert!(!is_valid_email(".john@acme.com"));
        assert!(!is_valid_email("john..doe@acme.com"));
        assert!(!is_valid_email("john@acme..com"));
        assert!(!is_valid_email("john doe@acme.com"));
        assert!(!is_valid_email(&format!("{}@acme.com", "a".repeat(65))));
    }

    #[test]
    fn test_salary_parsing() {
        assert_eq!(parse_salary("50000"), Some(50000.0));
        assert_eq!(parse_salary("1234.56"), Some(1234.56));
        assert_eq!(parse_salary("0"), Some(0.0));
        assert_eq!(parse_salary("-0"), Some(0.0));
        assert_eq!(parse_salary("1e3"), Some(1000.0));
        assert_eq!(parse_salary("-0.01"), None);
        assert_eq!(parse_salary("NaN"), None);
        assert_eq!(parse_salary("inf"), None);
        assert_eq!(parse_salary("12abc"), None);
    }
}
