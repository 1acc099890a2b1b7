//! End-to-end flows through the public API.

use chrono::NaiveDate;
use healthdesk_core::forms::{FieldValue, Form, FormCatalogue, FormKind};
use healthdesk_core::regions::SessionState;
use healthdesk_core::{
    CoreConfig, FormController, MockSubmitter, Point, SubmitOutcome, SymptomSelector,
    TracingNotifier,
};
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn catalogue() -> FormCatalogue {
    let cfg = CoreConfig::builtin().expect("builtin config");
    FormCatalogue::new(cfg.locations(), today()).expect("catalogue")
}

fn text(value: &str) -> FieldValue {
    FieldValue::text(value)
}

#[test]
fn every_valid_mobile_number_passes_and_other_eleven_digit_strings_fail() {
    let catalogue = catalogue();
    let mut form = Form::new(catalogue.schema(FormKind::Register));

    for first in 0..10u32 {
        for second in 0..10u32 {
            let number = format!("{first}{second}123456789");
            form.set_raw("mobile", &number).expect("known field");
            let valid = first == 1 && second >= 3;
            assert_eq!(form.error("mobile").is_none(), valid, "{number}");
        }
    }
}

#[test]
fn changing_province_clears_city_and_district_in_one_step() {
    let catalogue = catalogue();
    let mut form = Form::new(catalogue.schema(FormKind::Profile));

    form.set_field_value("province", text("北京市")).expect("province");
    form.set_field_value("city", text("朝阳区")).expect("city");
    form.set_field_value("district", text("三里屯")).expect("district");
    assert_eq!(form.value("district"), Some(&text("三里屯")));

    form.set_field_value("province", text("上海市")).expect("province");
    let state = form.state();
    for child in ["city", "district"] {
        let field = state.field(child).expect("declared");
        assert_eq!(field.value, FieldValue::Empty, "{child}");
        assert_eq!(field.error, None, "{child}");
    }
    let cities = form.options_for("city").expect("known").expect("enumerated");
    assert!(!cities.disabled);
    assert!(cities.contains("浦东新区"));
    let districts = form.options_for("district").expect("known").expect("enumerated");
    assert!(districts.disabled);
    assert!(districts.options.is_empty());
}

#[test]
fn setting_province_to_same_value_keeps_children() {
    let catalogue = catalogue();
    let mut form = Form::new(catalogue.schema(FormKind::Profile));
    form.set_field_value("province", text("北京市")).expect("province");
    form.set_field_value("city", text("海淀区")).expect("city");
    form.set_field_value("province", text("北京市")).expect("province");
    assert_eq!(form.value("city"), Some(&text("海淀区")));
}

#[test]
fn password_policy_and_confirmation_error_placement() {
    let catalogue = catalogue();
    let mut form = Form::new(catalogue.schema(FormKind::Register));

    form.set_raw("password", "Abcdefg1!").expect("field");
    assert_eq!(form.error("password"), None);
    form.set_raw("password", "abcdefgh").expect("field");
    assert!(form.error("password").is_some());

    for (field, value) in [
        ("id_number", "11010119800101123X"),
        ("name", "王晓红"),
        ("mobile", "13800138000"),
        ("verification_code", "123456"),
        ("password", "Abcdefg1!"),
        ("confirm_password", "Abcdefg1?"),
    ] {
        form.set_raw(field, value).expect("field");
    }

    let errors = form.validate_all().expect_err("passwords differ");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("confirm_password"), Some("The two passwords do not match"));
    assert!(!errors.contains("password"));
    assert_eq!(form.error("password"), None);

    form.set_raw("confirm_password", "Abcdefg1!").expect("field");
    form.validate_all().expect("now valid");
}

#[test]
fn profile_payload_holds_exactly_the_filled_fields() {
    let catalogue = catalogue();
    let mut form = Form::new(catalogue.schema(FormKind::Profile));

    form.set_raw("height", "170").expect("height");
    form.set_raw("weight", "65").expect("weight");
    form.set_raw("province", "北京市").expect("province");
    form.set_raw("city", "朝阳区").expect("city");
    form.set_raw("district", "三里屯").expect("district");
    form.set_raw("birth_date", "1990-05-20").expect("birth date");
    form.set_raw("address", "朝阳区三里屯路19号").expect("address");

    let payload = form.validate_all().expect("valid profile");
    let fields: Vec<&str> = payload.fields().map(|f| f.as_str()).collect();
    assert_eq!(
        fields,
        ["address", "birth_date", "city", "district", "height", "province", "weight"]
    );
    assert_eq!(payload.get("height"), Some(&FieldValue::Number(170.0)));
    assert_eq!(payload.get("weight"), Some(&FieldValue::Number(65.0)));
    assert_eq!(payload.get("district"), Some(&text("三里屯")));
    assert_eq!(
        payload.get("birth_date"),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(1990, 5, 20).expect("date")))
    );
    assert!(payload.get("gender").is_none());

    let json = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(json["birth_date"], "1990-05-20");
    assert_eq!(json["height"], 170.0);
}

#[test]
fn tagging_session_properties() {
    let cfg = CoreConfig::builtin().expect("builtin config");
    let mut selector = SymptomSelector::new(Arc::clone(cfg.regions()));

    selector.activate_at(Point::new(50.0, 10.0)).expect("ok").expect("head");
    let record = selector.commit().expect("commit");
    assert!(record.selected_tags.is_empty());
    assert_eq!(record.notes, "");

    selector.activate_region("chest").expect("chest");
    selector.toggle_tag("胸痛").expect("offered");
    selector.toggle_tag("胸痛").expect("offered");
    match selector.state() {
        SessionState::RegionActive(session) => assert!(session.selected_tags().is_empty()),
        SessionState::Idle => panic!("session should be open"),
    }

    selector.toggle_tag("心悸").expect("offered");
    selector.activate_region("back").expect("back");
    assert_eq!(selector.records().len(), 1);
    selector.toggle_tag("背痛").expect("offered");
    selector.commit().expect("commit");

    let regions: Vec<&str> = selector.records().iter().map(|r| r.region_id.as_str()).collect();
    assert_eq!(regions, ["head", "back"]);
    assert!(selector.records()[0].created_at < selector.records()[1].created_at);
}

#[tokio::test(start_paused = true)]
async fn profile_submission_through_mock_collaborator() {
    let cfg = CoreConfig::builtin().expect("builtin config");
    let catalogue = FormCatalogue::new(cfg.locations(), today()).expect("catalogue");
    let mut controller = FormController::new(
        Form::new(catalogue.schema(FormKind::Profile)),
        MockSubmitter::new(cfg.submit_delay()),
        Arc::new(TracingNotifier),
    );

    let outcome = controller.submit().await;
    match &outcome {
        SubmitOutcome::Invalid(errors) => {
            assert!(errors.contains("province"));
            assert!(errors.contains("birth_date"));
            assert!(!errors.contains("height"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(controller.submitter().calls(), 0);

    let form = controller.form_mut();
    for (field, value) in [
        ("birth_date", "1985-01-01"),
        ("province", "广东省"),
        ("city", "深圳市"),
        ("district", "南山区"),
        ("address", "科技园南区一号"),
    ] {
        form.set_raw(field, value).expect("field");
    }
    assert!(controller.submit().await.is_submitted());
    assert_eq!(controller.submitter().calls(), 1);
}
