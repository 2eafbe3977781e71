use chrono::{DateTime, TimeZone, Utc};
use valtype::{convert, ValtypeError, Date, Geo, Geometry, TypeId, Value};

fn moment() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 1, 12, 30, 0).unwrap()
}

fn samples() -> Vec<Value> {
    vec![
        Value::Binary(b"raw bytes".to_vec()),
        Value::Int32(-17),
        Value::Float(2.5),
        Value::Bool(true),
        Value::DateTime(moment()),
        Value::from("hello world"),
        Value::Date(Date::from_ymd(2016, 3, 1).unwrap()),
        Value::Geo(Geo::new(Geometry::Point { coordinates: [13.4, 52.5] }).unwrap()),
    ]
}

#[test]
fn int_to_string() {
    assert_eq!(convert(&Value::Int32(42), TypeId::String).expect("convert"), Value::from("42"));
}

#[test]
fn string_to_float() {
    assert_eq!(convert(&Value::from("3.14"), TypeId::Float).expect("convert"), Value::Float(3.14));
}

#[test]
fn malformed_float() {
    let err = convert(&Value::from("not-a-number"), TypeId::Float).unwrap_err();
    match &err {
        ValtypeError::Malformed { text, to, .. } => {
            assert_eq!(text, "not-a-number");
            assert_eq!(*to, TypeId::Float);
        }
        other => panic!("expected a malformed text error, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("not-a-number") && msg.contains("float"), "unexpected msg: {msg}");
}

#[test]
fn bool_to_geo_is_unsupported() {
    let err = convert(&Value::Bool(true), TypeId::Geo).unwrap_err();
    assert!(err.is_cannot_convert());
    assert_eq!(err, ValtypeError::CannotConvert { value: "true".to_string(), to: TypeId::Geo });
    assert_eq!(err.to_string(), "Cannot convert true to type geo");
}

#[test]
fn identity_returns_the_value_unchanged() {
    for value in samples() {
        let converted = convert(&value, value.type_id()).expect("identity");
        assert_eq!(converted, value);
    }
}

#[test]
fn identity_keeps_non_utf8_bytes() {
    let bytes = Value::Binary(vec![0xff, 0x00, 0xfe]);
    assert_eq!(convert(&bytes, TypeId::Binary).expect("identity"), bytes);
}

#[test]
fn everything_converts_to_string_and_bytes() {
    for value in samples() {
        let text = value.marshal_text().expect("marshal");
        assert_eq!(convert(&value, TypeId::String).expect("to string"), Value::String(text.clone()));
        let expected_bytes = match &value {
            Value::Binary(b) => b.clone(),
            _ => text.into_bytes(),
        };
        assert_eq!(convert(&value, TypeId::Binary).expect("to bytes"), Value::Binary(expected_bytes));
    }
}

#[test]
fn canonical_text_forms() {
    let cases = [
        (Value::Int32(-17), "-17"),
        (Value::Float(2.5), "2.5"),
        (Value::Float(1.0), "1"),
        (Value::Bool(false), "false"),
        (Value::DateTime(moment()), "2016-03-01T12:30:00Z"),
        (Value::Date(Date::from_ymd(2016, 3, 1).unwrap()), "2016-03-01"),
        (
            Value::Geo(Geo::new(Geometry::Point { coordinates: [1.0, 2.0] }).unwrap()),
            r#"{"type":"Point","coordinates":[1.0,2.0]}"#,
        ),
        (Value::Geo(Geo::default()), r#"{"type":"GeometryCollection","geometries":[]}"#),
    ];
    for (value, text) in cases {
        assert_eq!(convert(&value, TypeId::String).expect("to string"), Value::from(text));
    }
}

#[test]
fn round_trip_through_text() {
    let mut values = samples();
    values.push(Value::Float(0.1 + 0.2));
    values.push(Value::Int32(i32::MIN));
    values.push(Value::DateTime(moment() + chrono::Duration::milliseconds(250)));
    values.push(Value::Geo(Geo::new(Geometry::Polygon {
        coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
    }).unwrap()));
    for value in values {
        let text = convert(&value, TypeId::String).expect("to string");
        assert_eq!(convert(&text, value.type_id()).expect("from string"), value);
        let bytes = convert(&value, TypeId::Binary).expect("to bytes");
        assert_eq!(convert(&bytes, value.type_id()).expect("from bytes"), value);
    }
}

#[test]
fn bytes_parse_like_strings() {
    let from_bytes = convert(&Value::Binary(b"2016-03-01".to_vec()), TypeId::Date).expect("bytes");
    let from_string = convert(&Value::from("2016-03-01"), TypeId::Date).expect("string");
    assert_eq!(from_bytes, from_string);
    assert_eq!(convert(&Value::Binary(b"12".to_vec()), TypeId::Int32).expect("bytes"), Value::Int32(12));
}

#[test]
fn non_utf8_bytes_are_rejected() {
    let bytes = Value::Binary(vec![0xff, 0xfe]);
    assert_eq!(convert(&bytes, TypeId::String).unwrap_err(), ValtypeError::InvalidUtf8 { to: TypeId::String });
    assert_eq!(convert(&bytes, TypeId::Int32).unwrap_err(), ValtypeError::InvalidUtf8 { to: TypeId::Int32 });
}

#[test]
fn conversion_leaves_the_source_alone() {
    let source = Value::from("42");
    let copy = source.clone();
    let _ = convert(&source, TypeId::Int32).expect("convert");
    let _ = convert(&source, TypeId::Geo).unwrap_err();
    assert_eq!(source, copy);
}

#[test]
fn int_from_float_truncates() {
    assert_eq!(convert(&Value::Float(2.9), TypeId::Int32).expect("convert"), Value::Int32(2));
    assert_eq!(convert(&Value::Float(-2.9), TypeId::Int32).expect("convert"), Value::Int32(-2));
}

#[test]
fn int_from_float_out_of_range() {
    for f in [1.5e10, -1.5e10, f64::NAN, f64::INFINITY] {
        let err = convert(&Value::Float(f), TypeId::Int32).unwrap_err();
        assert!(matches!(err, ValtypeError::OutOfRange { to: TypeId::Int32, .. }), "{f}: {err:?}");
    }
}

#[test]
fn int_from_bool_and_time() {
    assert_eq!(convert(&Value::Bool(true), TypeId::Int32).expect("convert"), Value::Int32(1));
    assert_eq!(convert(&Value::Bool(false), TypeId::Int32).expect("convert"), Value::Int32(0));
    assert_eq!(convert(&Value::DateTime(moment()), TypeId::Int32).expect("convert"), Value::Int32(1456835400));
    let date = Value::Date(Date::from_ymd(2016, 3, 1).unwrap());
    assert_eq!(convert(&date, TypeId::Int32).expect("convert"), Value::Int32(1456790400));
}

#[test]
fn int_from_far_future_is_out_of_range() {
    let far = Value::DateTime(Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap());
    assert!(matches!(convert(&far, TypeId::Int32).unwrap_err(), ValtypeError::OutOfRange { .. }));
}

#[test]
fn float_from_other_kinds() {
    assert_eq!(convert(&Value::Int32(-7), TypeId::Float).expect("convert"), Value::Float(-7.0));
    assert_eq!(convert(&Value::Bool(true), TypeId::Float).expect("convert"), Value::Float(1.0));
    let with_millis = Value::DateTime(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 10).unwrap() + chrono::Duration::milliseconds(500));
    assert_eq!(convert(&with_millis, TypeId::Float).expect("convert"), Value::Float(10.5));
    let date = Value::Date(Date::from_ymd(2016, 3, 1).unwrap());
    assert_eq!(convert(&date, TypeId::Float).expect("convert"), Value::Float(1456790400.0));
}

#[test]
fn bool_from_numbers() {
    assert_eq!(convert(&Value::Int32(0), TypeId::Bool).expect("convert"), Value::Bool(false));
    assert_eq!(convert(&Value::Int32(-3), TypeId::Bool).expect("convert"), Value::Bool(true));
    assert_eq!(convert(&Value::Float(0.0), TypeId::Bool).expect("convert"), Value::Bool(false));
    assert_eq!(convert(&Value::Float(0.25), TypeId::Bool).expect("convert"), Value::Bool(true));
}

#[test]
fn datetime_from_other_kinds() {
    let midnight = Utc.with_ymd_and_hms(2016, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(convert(&Value::Int32(1456790400), TypeId::DateTime).expect("convert"), Value::DateTime(midnight));
    assert_eq!(
        convert(&Value::Float(1.5), TypeId::DateTime).expect("convert"),
        Value::DateTime(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(1500))
    );
    assert_eq!(
        convert(&Value::Float(-0.5), TypeId::DateTime).expect("convert"),
        Value::DateTime(DateTime::<Utc>::UNIX_EPOCH - chrono::Duration::milliseconds(500))
    );
    let date = Value::Date(Date::from_ymd(2016, 3, 1).unwrap());
    assert_eq!(convert(&date, TypeId::DateTime).expect("convert"), Value::DateTime(midnight));
    assert!(matches!(
        convert(&Value::Float(f64::NAN), TypeId::DateTime).unwrap_err(),
        ValtypeError::OutOfRange { to: TypeId::DateTime, .. }
    ));
}

#[test]
fn date_from_datetime_drops_the_time_of_day() {
    let date = convert(&Value::DateTime(moment()), TypeId::Date).expect("convert");
    assert_eq!(date, Value::Date(Date::from_ymd(2016, 3, 1).unwrap()));
    assert_eq!(date.to_string(), "2016-03-01");
}

#[test]
fn geo_only_converts_through_text() {
    let geo = Value::Geo(Geo::new(Geometry::Point { coordinates: [13.4, 52.5] }).unwrap());
    for to in [TypeId::Int32, TypeId::Float, TypeId::Bool, TypeId::DateTime, TypeId::Date] {
        assert!(convert(&geo, to).unwrap_err().is_cannot_convert(), "geo to {to}");
    }
    let err = convert(&Value::Int32(1), TypeId::Geo).unwrap_err();
    assert_eq!(err.to_string(), "Cannot convert 1 to type geo");
}

#[test]
fn malformed_text_for_each_kind() {
    let cases = [
        ("12.5", TypeId::Int32),
        ("2147483648", TypeId::Int32),
        ("", TypeId::Float),
        ("yes", TypeId::Bool),
        ("2016-13-01", TypeId::Date),
        ("March 1st", TypeId::DateTime),
        ("POINT(1 2)", TypeId::Geo),
    ];
    for (text, to) in cases {
        match convert(&Value::from(text), to).unwrap_err() {
            ValtypeError::Malformed { text: t, to: id, .. } => {
                assert_eq!(t, text);
                assert_eq!(id, to);
            }
            other => panic!("{text:?} as {to}: expected malformed, got {other:?}"),
        }
    }
}

#[test]
fn boundary_years_round_trip() {
    let values = [
        Value::DateTime(Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap()),
        Value::DateTime(Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap()),
        Value::Date(Date::from_ymd(0, 1, 1).unwrap()),
        Value::Date(Date::from_ymd(9999, 12, 31).unwrap()),
    ];
    for value in values {
        let text = convert(&value, TypeId::String).expect("to string");
        assert_eq!(convert(&text, value.type_id()).expect("from string"), value);
    }
    assert_eq!(
        convert(&Value::Date(Date::from_ymd(9999, 12, 31).unwrap()), TypeId::String).expect("to string"),
        Value::from("9999-12-31")
    );
    assert_eq!(
        convert(&Value::Float(253402300799.0), TypeId::DateTime).expect("convert"),
        Value::DateTime(Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap())
    );
}

#[test]
fn years_without_a_text_form_are_rejected() {
    assert!(Date::from_ymd(10000, 1, 1).is_none());
    assert!(Date::from_ymd(-1, 12, 31).is_none());
    assert!(matches!(
        convert(&Value::Float(1e12), TypeId::DateTime).unwrap_err(),
        ValtypeError::OutOfRange { to: TypeId::DateTime, .. }
    ));
    assert!(matches!(
        convert(&Value::Float(-1e12), TypeId::DateTime).unwrap_err(),
        ValtypeError::OutOfRange { to: TypeId::DateTime, .. }
    ));
    // an offset can push a valid looking timestamp past the last year
    assert!(matches!(
        convert(&Value::from("9999-12-31T23:00:00-05:00"), TypeId::DateTime).unwrap_err(),
        ValtypeError::Malformed { to: TypeId::DateTime, .. }
    ));
    // built directly, such a timestamp has no text and no date
    let far = Value::DateTime(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());
    assert!(matches!(
        convert(&far, TypeId::String).unwrap_err(),
        ValtypeError::OutOfRange { to: TypeId::String, .. }
    ));
    assert!(matches!(
        convert(&far, TypeId::Date).unwrap_err(),
        ValtypeError::OutOfRange { to: TypeId::Date, .. }
    ));
}
