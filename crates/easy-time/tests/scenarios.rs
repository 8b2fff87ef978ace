//! End-to-end behavior across the converter and the comparator.

use std::cmp::Ordering;

use chrono::{NaiveDate, TimeDelta};
use easy_time::{
    between, compare, convert, ordering_sign, ConversionError, Difference, EasyTime, Tolerance,
    DEFAULT_TOLERANCE,
};

#[test]
fn test_62_seconds_apart_exceeds_one_minute() {
    let ord = compare(
        "2012-04-15T09:13:20-05:00",
        "2012-04-15T09:14:22-05:00",
        Some(DEFAULT_TOLERANCE),
    )
    .unwrap();
    assert_eq!(ordering_sign(ord), -1);

    let a = convert("2012-04-15T09:13:20-05:00").unwrap();
    let b = convert("2012-04-15T09:14:22-05:00").unwrap();
    assert_eq!((b - a).num_seconds(), 62);
}

#[test]
fn test_httpdate_equals_iso8601_zulu() {
    assert_eq!(
        convert("Thu, 06 Oct 2011 02:26:12 GMT").unwrap(),
        convert("2011-10-06T02:26:12Z").unwrap()
    );
}

#[test]
fn test_between_free_form_strings_with_one_second_tolerance() {
    assert!(between(
        "2010-09-08 07:06:06 -04:00",
        "2010-09-08 07:06:05 -04:00",
        "2010-09-08 15:06:05 GMT",
        Some(Tolerance::seconds(1)),
    )
    .unwrap());
}

#[test]
fn test_subtract_one_hour() {
    let t = EasyTime::new(convert("2020-10-09T08:07:06-05:00").unwrap(), None).unwrap();
    let expected = convert("2020-10-09T07:07:06-05:00").unwrap();
    assert_eq!(
        t.subtract(TimeDelta::hours(1)).unwrap(),
        Difference::Time(EasyTime::from_instant(expected).with_tolerance(Tolerance::NONE))
    );
    assert_eq!((t - TimeDelta::hours(1)).instant(), expected);
}

#[test]
fn test_unparseable_text() {
    assert_eq!(
        convert("no such luck").unwrap_err(),
        ConversionError::UnparseableText("no such luck".to_string())
    );
}

#[test]
fn test_local_record_vs_remote_api() {
    // A database row written at 12:00:00 local (-07:00) and the API's echo
    // 40 seconds later in GMT.
    let record = EasyTime::new("2021-03-04 12:00:00 -07:00", None).unwrap();
    let api = "Thu, 04 Mar 2021 19:00:40 GMT";
    assert!(record.is_same(api, None).unwrap());
    assert!(!record.is_newer(api, None).unwrap());
    assert!(record.is_older(api, Some(Tolerance::seconds(30))).unwrap());
}

#[test]
fn test_calendar_date_is_midnight() {
    let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    let ord = compare(date, "2021-03-04T00:00:00Z", Some(Tolerance::NONE)).unwrap();
    assert_eq!(ord, Ordering::Equal);
}

#[test]
fn test_json_input() {
    let value = serde_json::json!([2021, 3, 4, 12, 0, 0, -25_200]);
    let input = easy_time::ConvertibleValue::from_json(&value).unwrap();
    assert!(EasyTime::new(input, None)
        .unwrap()
        .is_same("2021-03-04T19:00:00Z", Some(Tolerance::NONE))
        .unwrap());

    let err = easy_time::ConvertibleValue::from_json(&serde_json::json!(false)).unwrap_err();
    assert_eq!(err, ConversionError::UnknownType("false".to_string()));
}
