use chrono::{NaiveDate, NaiveTime};
use dtgen_ir::parse::{parse_elements, ParseError};
use dtgen_ir::types::{CandidateSource, DataValue, ValueType};
use pretty_assertions::assert_eq;

#[test]
fn test_parse_fixture() {
    let json = include_str!("fixtures/registration_form.json");
    let elements = parse_elements(json).unwrap();
    assert_eq!(elements.len(), 8);

    let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "username",
            "age",
            "salary",
            "birth_date",
            "country",
            "profession",
            "newsletter",
            "total"
        ]
    );
}

#[test]
fn test_values_are_coerced_to_declared_type() {
    let json = include_str!("fixtures/registration_form.json");
    let elements = parse_elements(json).unwrap();

    let salary = &elements[2];
    assert_eq!(salary.value_type, ValueType::Double);
    assert_eq!(salary.min_value, Some(DataValue::Double(1500.0)));

    let birth = &elements[3];
    assert_eq!(
        birth.min_value,
        Some(DataValue::Date(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()))
    );

    let total = &elements[7];
    assert_eq!(total.computed, Some(DataValue::Double(42.0)));
}

#[test]
fn test_defaults() {
    let json = include_str!("fixtures/registration_form.json");
    let elements = parse_elements(json).unwrap();

    let profession = &elements[5];
    assert_eq!(profession.value_type, ValueType::String);
    assert!(!profession.required);
    assert!(profession.invalid_eligible);
    assert_eq!(
        profession.set,
        Some(CandidateSource::Query("SELECT name FROM profession".into()))
    );

    assert!(!elements[6].invalid_eligible);
}

#[test]
fn test_set_values_keep_order() {
    let json = include_str!("fixtures/registration_form.json");
    let elements = parse_elements(json).unwrap();
    match &elements[4].set {
        Some(CandidateSource::List(values)) => {
            assert_eq!(values.first(), Some(&DataValue::String("Brazil".into())));
            assert_eq!(values.last(), Some(&DataValue::String("Norway".into())));
        }
        other => panic!("expected list set, got {other:?}"),
    }
}

#[test]
fn test_string_set_keeps_temporal_looking_values_verbatim() {
    let json = r#"[{
        "name": "slot",
        "value_type": "string",
        "set": { "list": ["10:30", "2024-01-01T10:00:00.5", "12:00:00.25"] },
        "computed": "2024-01-01"
    }]"#;
    let elements = parse_elements(json).unwrap();
    assert_eq!(
        elements[0].set,
        Some(CandidateSource::List(vec![
            DataValue::String("10:30".into()),
            DataValue::String("2024-01-01T10:00:00.5".into()),
            DataValue::String("12:00:00.25".into()),
        ]))
    );
    assert_eq!(elements[0].computed, Some(DataValue::String("2024-01-01".into())));
}

#[test]
fn test_time_element_accepts_short_and_fractional_times() {
    let json = r#"[{ "name": "slot", "value_type": "time", "min_value": "08:15", "max_value": "17:45:30.5" }]"#;
    let elements = parse_elements(json).unwrap();
    assert_eq!(
        elements[0].min_value,
        Some(DataValue::Time(NaiveTime::from_hms_opt(8, 15, 0).unwrap()))
    );
    assert_eq!(
        elements[0].max_value,
        Some(DataValue::Time(NaiveTime::from_hms_milli_opt(17, 45, 30, 500).unwrap()))
    );
}

#[test]
fn test_type_mismatch_is_reported() {
    let json = r#"[{ "name": "age", "value_type": "integer", "min_value": "eighteen" }]"#;
    let err = parse_elements(json).unwrap_err();
    assert!(matches!(
        err,
        ParseError::TypeMismatch {
            field: "min_value",
            ..
        }
    ));
}

#[test]
fn test_duplicate_names_rejected() {
    let json = r#"[{ "name": "a" }, { "name": "a" }]"#;
    assert!(matches!(
        parse_elements(json),
        Err(ParseError::DuplicateElement(name)) if name == "a"
    ));
}

#[test]
fn test_parse_invalid_json() {
    assert!(parse_elements("not json at all").is_err());
}
