//! The dashboard's forms.
//!
//! Each builder returns a validated [`FormSchema`]. Patterns are anchored and use `[0-9]` rather
//! than `\d` so only ASCII digits are accepted.

use super::graph::{CrossFieldRule, FormSchema};
use super::schema::{FieldSchema, Rule};
use super::value::FieldValue;
use crate::constants::{EARLIEST_BIRTH_DATE, GENDERS};
use crate::error::{HealthError, HealthResult};
use crate::locations::LocationTree;
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;

/// 15 digits, 18 digits, or 17 digits followed by a digit or `X`/`x` checksum.
pub const NATIONAL_ID_PATTERN: &str = r"^(?:[0-9]{15}|[0-9]{18}|[0-9]{17}[0-9Xx])$";

/// `1`, then `3`–`9`, then nine digits.
pub const MOBILE_PATTERN: &str = r"^1[3-9][0-9]{9}$";

/// Two or more CJK unified ideographs.
pub const CHINESE_NAME_PATTERN: &str = r"^[\x{4e00}-\x{9fa5}]{2,}$";

pub fn register_schema() -> HealthResult<FormSchema> {
    FormSchema::builder("register")
        .field(
            FieldSchema::text("id_number")
                .required("Please enter your national ID number")
                .pattern(NATIONAL_ID_PATTERN, "Please enter a valid national ID number")?,
        )
        .field(
            FieldSchema::text("name")
                .required("Please enter your name")
                .pattern(CHINESE_NAME_PATTERN, "Please enter your name in Chinese characters")?,
        )
        .field(
            FieldSchema::text("mobile")
                .required("Please enter your mobile number")
                .pattern(MOBILE_PATTERN, "Please enter a valid mobile number")?,
        )
        .field(FieldSchema::text("verification_code").required("Please enter the verification code"))
        .field(
            FieldSchema::text("password")
                .required("Please enter a password")
                .min_length(8, "Password must be at least 8 characters")
                .rule(
                    Rule::PasswordStrength,
                    "Password must contain upper and lower case letters, a digit and a special character",
                ),
        )
        .field(FieldSchema::text("confirm_password").required("Please confirm your password"))
        .cross_check(CrossFieldRule::must_match(
            "confirm_password",
            "password",
            "The two passwords do not match",
        ))
        .build()
}

pub fn login_schema() -> HealthResult<FormSchema> {
    FormSchema::builder("login")
        .field(FieldSchema::text("identifier").required("Please enter your username or ID number"))
        .field(
            FieldSchema::text("password")
                .required("Please enter your password")
                .min_length(6, "Password must be at least 6 characters"),
        )
        .field(
            FieldSchema::text("mobile")
                .pattern(MOBILE_PATTERN, "Please enter a valid mobile number")?,
        )
        .field(FieldSchema::text("verification_code"))
        .field(FieldSchema::boolean("remember_me").default_value(FieldValue::Boolean(false)))
        .build()
}

/// Personal information form with the province → city → district cascade.
///
/// Birth dates are accepted from 1900-01-01 up to and including `today`.
pub fn profile_schema(locations: &LocationTree, today: NaiveDate) -> HealthResult<FormSchema> {
    let earliest = NaiveDate::parse_from_str(EARLIEST_BIRTH_DATE, "%Y-%m-%d")
        .map_err(|e| HealthError::InvalidInput(format!("earliest birth date: {e}")))?;
    let provinces: Vec<&str> = locations.provinces().iter().map(String::as_str).collect();

    FormSchema::builder("profile")
        .field(FieldSchema::text("gender").one_of(GENDERS, "Please choose a gender"))
        .field(
            FieldSchema::date("birth_date")
                .required("Please choose your date of birth")
                .rule(
                    Rule::DateRange {
                        earliest,
                        latest: today,
                    },
                    "Date of birth must be between 1900-01-01 and today",
                ),
        )
        .field(
            FieldSchema::number("height")
                .required("Please enter your height")
                .min(50.0, "Height must be at least 50 cm")
                .max(250.0, "Height must be at most 250 cm")
                .default_value(FieldValue::Number(170.0)),
        )
        .field(
            FieldSchema::number("weight")
                .required("Please enter your weight")
                .min(20.0, "Weight must be at least 20 kg")
                .max(300.0, "Weight must be at most 300 kg")
                .default_value(FieldValue::Number(65.0)),
        )
        .field(
            FieldSchema::text("province")
                .required("Please choose a province")
                .one_of(&provinces, "Please choose a listed province"),
        )
        .field(
            FieldSchema::text("city")
                .required("Please choose a city")
                .depends_on("province", locations.cities().clone()),
        )
        .field(
            FieldSchema::text("district")
                .required("Please choose a district")
                .depends_on("city", locations.districts().clone()),
        )
        .field(
            FieldSchema::text("address")
                .required("Please enter your address")
                .min_length(5, "Please enter a detailed address of at least 5 characters")
                .max_length(100, "Address must be at most 100 characters"),
        )
        .build()
}

pub fn questionnaire_schema() -> HealthResult<FormSchema> {
    FormSchema::builder("questionnaire")
        .field(
            FieldSchema::text("medical_history")
                .required("Please describe your medical history")
                .min_length(10, "Please describe your medical history in at least 10 characters")
                .max_length(1000, "Medical history must be at most 1000 characters"),
        )
        .field(
            FieldSchema::number("duration_years")
                .min(0.0, "Years cannot be negative")
                .max(100.0, "Years cannot exceed 100")
                .default_value(FieldValue::Number(0.0)),
        )
        .field(
            FieldSchema::number("duration_months")
                .min(0.0, "Months cannot be negative")
                .max(11.0, "Months cannot exceed 11")
                .default_value(FieldValue::Number(0.0)),
        )
        .field(
            FieldSchema::text("treatment_history")
                .required("Please describe your treatments and their effect")
                .min_length(10, "Please describe your treatments in at least 10 characters")
                .max_length(1000, "Treatment description must be at most 1000 characters"),
        )
        .build()
}

pub fn family_member_schema() -> HealthResult<FormSchema> {
    FormSchema::builder("family")
        .field(
            FieldSchema::text("name")
                .required("Please enter a name")
                .min_length(2, "Name must be at least 2 characters"),
        )
        .field(FieldSchema::text("relation").required("Please choose a relation"))
        .field(
            FieldSchema::text("id_number")
                .required("Please enter a valid ID number")
                .min_length(18, "Please enter a valid ID number")
                .max_length(18, "Please enter a valid ID number"),
        )
        .field(
            FieldSchema::text("phone")
                .required("Please enter a valid phone number")
                .min_length(11, "Please enter a valid phone number")
                .max_length(11, "Please enter a valid phone number"),
        )
        .build()
}

/// Identifies one of the catalogue's forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormKind {
    Register,
    Login,
    Profile,
    Questionnaire,
    Family,
}

impl FormKind {
    pub const ALL: [FormKind; 5] = [
        FormKind::Register,
        FormKind::Login,
        FormKind::Profile,
        FormKind::Questionnaire,
        FormKind::Family,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Register => "register",
            FormKind::Login => "login",
            FormKind::Profile => "profile",
            FormKind::Questionnaire => "questionnaire",
            FormKind::Family => "family",
        }
    }
}

impl FromStr for FormKind {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HealthError::InvalidInput(format!("unknown form: {s}")))
    }
}

/// All form schemas, built once and shared by form instances.
#[derive(Clone, Debug)]
pub struct FormCatalogue {
    register: Arc<FormSchema>,
    login: Arc<FormSchema>,
    profile: Arc<FormSchema>,
    questionnaire: Arc<FormSchema>,
    family: Arc<FormSchema>,
}

impl FormCatalogue {
    pub fn new(locations: &LocationTree, today: NaiveDate) -> HealthResult<Self> {
        Ok(Self {
            register: Arc::new(register_schema()?),
            login: Arc::new(login_schema()?),
            profile: Arc::new(profile_schema(locations, today)?),
            questionnaire: Arc::new(questionnaire_schema()?),
            family: Arc::new(family_member_schema()?),
        })
    }

    pub fn schema(&self, kind: FormKind) -> Arc<FormSchema> {
        match kind {
            FormKind::Register => self.register.clone(),
            FormKind::Login => self.login.clone(),
            FormKind::Profile => self.profile.clone(),
            FormKind::Questionnaire => self.questionnaire.clone(),
            FormKind::Family => self.family.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::validate_field;
    use crate::forms::{FieldName, Form};

    fn field_result(schema: &FormSchema, field: &str, value: &str) -> Result<(), String> {
        let field = schema.field(field).expect("field exists");
        validate_field(field, &FieldValue::coerce(field.kind, value))
    }

    #[test]
    fn mobile_pattern_accepts_second_digit_three_to_nine() {
        let schema = register_schema().expect("schema");
        for second in '3'..='9' {
            let number = format!("1{second}012345678");
            assert!(field_result(&schema, "mobile", &number).is_ok(), "{number}");
        }
    }

    #[test]
    fn mobile_pattern_rejects_other_eleven_digit_strings() {
        let schema = register_schema().expect("schema");
        for number in ["10012345678", "12012345678", "23812345678", "99999999999"] {
            let err = field_result(&schema, "mobile", number).expect_err(number);
            assert_eq!(err, "Please enter a valid mobile number");
        }
        assert!(field_result(&schema, "mobile", "1380013800").is_err());
        assert!(field_result(&schema, "mobile", "138001380000").is_err());
        assert!(field_result(&schema, "mobile", "1٣8001380٠0").is_err());
    }

    #[test]
    fn national_id_accepts_documented_shapes() {
        let schema = register_schema().expect("schema");
        for id in ["110101800101123", "110101198001011234", "11010119800101123X", "11010119800101123x"] {
            assert!(field_result(&schema, "id_number", id).is_ok(), "{id}");
        }
        for id in ["1101011980010112", "11010119800101123Y", "1101011980010112345"] {
            assert!(field_result(&schema, "id_number", id).is_err(), "{id}");
        }
    }

    #[test]
    fn chinese_name_requires_two_ideographs() {
        let schema = register_schema().expect("schema");
        assert!(field_result(&schema, "name", "王晓红").is_ok());
        assert!(field_result(&schema, "name", "王").is_err());
        assert!(field_result(&schema, "name", "Wang").is_err());
    }

    #[test]
    fn password_rules_match_registration_policy() {
        let schema = register_schema().expect("schema");
        assert!(field_result(&schema, "password", "Abcdefg1!").is_ok());
        let err = field_result(&schema, "password", "abcdefgh").expect_err("weak");
        assert!(err.contains("upper and lower case"));
        let err = field_result(&schema, "password", "Ab1!").expect_err("short");
        assert_eq!(err, "Password must be at least 8 characters");
    }

    #[test]
    fn login_mobile_is_optional_but_checked_when_present() {
        let schema = login_schema().expect("schema");
        assert!(field_result(&schema, "mobile", "").is_ok());
        assert!(field_result(&schema, "mobile", "13800138000").is_ok());
        assert!(field_result(&schema, "mobile", "12345").is_err());
    }

    #[test]
    fn questionnaire_month_bounds() {
        let schema = questionnaire_schema().expect("schema");
        assert!(field_result(&schema, "duration_months", "11").is_ok());
        assert_eq!(
            field_result(&schema, "duration_months", "12"),
            Err("Months cannot exceed 11".to_string())
        );
        assert_eq!(
            field_result(&schema, "duration_years", "-1"),
            Err("Years cannot be negative".to_string())
        );
    }

    #[test]
    fn family_member_requires_exact_lengths() {
        let schema = family_member_schema().expect("schema");
        assert!(field_result(&schema, "id_number", "31010119800101123X").is_ok());
        assert!(field_result(&schema, "id_number", "3101011980").is_err());
        assert!(field_result(&schema, "phone", "13800138000").is_ok());
        assert!(field_result(&schema, "phone", "1380013800").is_err());
    }

    #[test]
    fn profile_rejects_future_birth_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let schema = profile_schema(&LocationTree::builtin(), today).expect("schema");
        assert!(field_result(&schema, "birth_date", "2026-10-19").is_ok());
        assert!(field_result(&schema, "birth_date", "2026-10-20").is_err());
        assert!(field_result(&schema, "birth_date", "1899-12-31").is_err());
    }

    #[test]
    fn profile_defaults_match_dashboard() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let form = Form::new(Arc::new(
            profile_schema(&LocationTree::builtin(), today).expect("schema"),
        ));
        assert_eq!(form.value("height"), Some(&FieldValue::Number(170.0)));
        assert_eq!(form.value("weight"), Some(&FieldValue::Number(65.0)));
        assert_eq!(form.value("province"), Some(&FieldValue::Empty));
    }

    #[test]
    fn profile_reports_unlisted_gender_and_province() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut form = Form::new(Arc::new(
            profile_schema(&LocationTree::builtin(), today).expect("schema"),
        ));
        for (field, value) in [
            ("birth_date", "1990-05-20"),
            ("province", "北京市"),
            ("city", "朝阳区"),
            ("district", "三里屯"),
            ("address", "朝阳区三里屯路19号"),
            ("gender", "alien"),
        ] {
            form.set_raw(field, value).expect("field");
        }
        assert_eq!(form.error("gender"), Some("Please choose a gender"));
        let errors = form.validate_all().expect_err("unlisted gender");
        assert_eq!(errors.get("gender"), Some("Please choose a gender"));

        form.set_raw("province", "火星").expect("field");
        assert_eq!(form.value("province"), Some(&FieldValue::text("火星")));
        assert_eq!(form.error("province"), Some("Please choose a listed province"));
        assert_eq!(form.value("city"), Some(&FieldValue::Empty));
    }

    #[test]
    fn form_kind_parses_names() {
        assert_eq!("profile".parse::<FormKind>().expect("known"), FormKind::Profile);
        assert!("checkout".parse::<FormKind>().is_err());
    }

    #[test]
    fn profile_location_chain_is_three_levels_deep() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let schema = profile_schema(&LocationTree::builtin(), today).expect("schema");
        assert_eq!(schema.parent_of("province"), None);
        assert_eq!(
            schema.descendants("province"),
            vec![FieldName::from("city"), FieldName::from("district")]
        );
        assert!(schema.children("district").is_empty());
        assert_eq!(schema.edges().len(), 2);
    }
}
