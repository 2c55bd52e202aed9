use ferrum_form_datetime::{
    count_separators, date_required_feedback, parse_fhir_date_to_display_date,
    parse_input_date_to_fhir_date, validate_date_input, validate_time_input, DateFeedback, Error,
    Period, TimeFeedback,
};

#[test]
fn full_date_is_accepted_and_converted() {
    assert_eq!(validate_date_input("15/03/2024", false), None);
    assert_eq!(parse_input_date_to_fhir_date("15/03/2024").unwrap(), "2024-03-15");
}

#[test]
fn month_year_is_accepted_and_converted() {
    assert_eq!(validate_date_input("03/2024", false), None);
    assert_eq!(parse_input_date_to_fhir_date("03/2024").unwrap(), "2024-03");
}

#[test]
fn year_is_accepted_and_converted() {
    assert_eq!(validate_date_input("2024", false), None);
    assert_eq!(parse_input_date_to_fhir_date("2024").unwrap(), "2024");
}

#[test]
fn out_of_range_segments_are_reported() {
    assert_eq!(
        validate_date_input("32/13/2024", false),
        Some(DateFeedback::InvalidDate)
    );
    assert_eq!(validate_date_input("13/2024", false), Some(DateFeedback::InvalidDate));
    assert_eq!(validate_date_input("00/01/2024", false), Some(DateFeedback::InvalidDate));
}

#[test]
fn day_beyond_month_end_is_reported() {
    assert_eq!(validate_date_input("31/02/2024", false), Some(DateFeedback::InvalidDate));
    assert_eq!(validate_date_input("29/02/2024", false), None);
    assert_eq!(validate_date_input("29/02/2023", false), Some(DateFeedback::InvalidDate));
    assert_eq!(
        parse_input_date_to_fhir_date("31/02/2024"),
        Err(Error::InvalidDate("31/02/2024".into()))
    );
}

#[test]
fn malformed_shapes_are_reported_by_separator_count() {
    assert_eq!(
        validate_date_input("2024-03-15", false),
        Some(DateFeedback::WrongSeparator)
    );
    assert_eq!(validate_date_input("15/03/24", false), Some(DateFeedback::NotFullDate));
    assert_eq!(validate_date_input("15/Mar/2024", false), Some(DateFeedback::NotFullDate));
    assert_eq!(validate_date_input("Mar/2024", false), Some(DateFeedback::NotMonthYear));
    assert_eq!(validate_date_input("15 Mar", false), Some(DateFeedback::NoMatchingFormat));
    assert_eq!(validate_date_input("1/2/3/4", false), Some(DateFeedback::NoMatchingFormat));
}

#[test]
fn unreadable_stored_value_reports_invalid_date() {
    let display = parse_fhir_date_to_display_date("20240315");
    assert!(display.parse_failed);
    assert_eq!(display.display_date, "20240315");
    assert_eq!(
        validate_date_input(&display.display_date, display.parse_failed),
        Some(DateFeedback::InvalidDate)
    );
}

#[test]
fn feedback_messages() {
    assert_eq!(
        DateFeedback::WrongSeparator.to_string(),
        "Input does not match the required format with \"/\" as the separator."
    );
    assert_eq!(
        DateFeedback::NotFullDate.message(),
        "Input does not match the format DD/MM/YYYY."
    );
    assert_eq!(
        DateFeedback::NotMonthYear.message(),
        "Input does not match the formats MM/YYYY or DD/MM/YYYY."
    );
    assert_eq!(DateFeedback::InvalidDate.message(), "Input is an invalid date.");
    assert_eq!(
        DateFeedback::NoMatchingFormat.message(),
        "Input does not match any date format."
    );
    assert_eq!(DateFeedback::DateRequired.message(), "Date is required");
}

#[test]
fn date_required_only_without_other_feedback() {
    assert_eq!(
        date_required_feedback("", "10:30", None, None),
        Some(DateFeedback::DateRequired)
    );
    assert_eq!(
        date_required_feedback("", " ", None, None),
        Some(DateFeedback::DateRequired)
    );
    assert_eq!(date_required_feedback("", "", None, None), None);
    assert_eq!(date_required_feedback("15/03/2024", "10:30", None, None), None);
    assert_eq!(
        date_required_feedback("15-03", "10:30", Some(DateFeedback::WrongSeparator), None),
        Some(DateFeedback::WrongSeparator)
    );
}

#[test]
fn invalid_time_hides_date_required() {
    let time_feedback = validate_time_input("10.30", None, false).feedback;
    assert_eq!(time_feedback, Some(TimeFeedback::WrongSeparator));
    assert_eq!(date_required_feedback("", "10.30", None, time_feedback), None);

    let time_feedback = validate_time_input("10:30", None, false).feedback;
    assert_eq!(time_feedback, Some(TimeFeedback::PeriodRequired));
    assert_eq!(date_required_feedback("", "10:30", None, time_feedback), None);

    let time_feedback = validate_time_input("10:30", Some(Period::Am), false).feedback;
    assert_eq!(
        date_required_feedback("", "10:30", None, time_feedback),
        Some(DateFeedback::DateRequired)
    );
}

#[test]
fn separator_counts() {
    assert_eq!(count_separators("2024-01-01", '-'), 2);
    assert_eq!(count_separators("", '/'), 0);
    assert_eq!(count_separators("//", '/'), 2);
}
