use onspot_core::{FormField, RegistrationForm, RegistrationValidationError};

fn valid_form() -> RegistrationForm {
    RegistrationForm::default()
        .with(FormField::Name, "A")
        .with(FormField::Email, "x@gmail.com")
        .with(FormField::Phone, "9876543210")
        .with(FormField::College, "X")
        .with(FormField::Dept, "Y")
        .with(FormField::Year, "B.Tech")
}

#[test]
fn complete_gmail_and_ten_digit_phone_is_valid() {
    assert_eq!(valid_form().validate(), Ok(()));
}

#[test]
fn blank_or_absent_field_is_missing_field_even_with_bad_email_and_phone() {
    for field in FormField::ALL {
        let blank = valid_form()
            .with(FormField::Email, "not-an-email")
            .with(FormField::Phone, "12")
            .with(field, "   \t");
        assert_eq!(
            blank.validate(),
            Err(RegistrationValidationError::MissingField(field)),
            "field {field:?}"
        );
    }

    let mut absent = valid_form();
    absent.dept = None;
    assert_eq!(
        absent.validate(),
        Err(RegistrationValidationError::MissingField(FormField::Dept))
    );
}

#[test]
fn first_blank_field_in_form_order_is_reported() {
    let form = RegistrationForm::default().with(FormField::Name, "A");
    assert_eq!(
        form.validate(),
        Err(RegistrationValidationError::MissingField(FormField::Email))
    );
}

#[test]
fn email_failures_take_precedence_over_phone() {
    for email in [
        "x@yahoo.com",
        "x@gmail.co",
        "x@y@gmail.com",
        "x.gmail.com",
        "x@gmail.com.in",
    ] {
        let form = valid_form()
            .with(FormField::Email, email)
            .with(FormField::Phone, "bad");
        assert_eq!(
            form.validate(),
            Err(RegistrationValidationError::InvalidEmail),
            "email {email}"
        );
    }
}

#[test]
fn email_is_trimmed_before_checking() {
    let form = valid_form().with(FormField::Email, "  x@gmail.com  ");
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn phone_must_be_exactly_ten_ascii_digits() {
    for phone in ["123456789", "12345678901", "12345 67890", "12345abcde", "+911234567890"] {
        let form = valid_form().with(FormField::Phone, phone);
        assert_eq!(
            form.validate(),
            Err(RegistrationValidationError::InvalidPhone),
            "phone {phone}"
        );
    }

    let padded = valid_form().with(FormField::Phone, " 9876543210 ");
    assert_eq!(padded.validate(), Ok(()));
}

#[test]
fn to_payload_trims_values_and_keeps_uid() {
    let form = valid_form()
        .with(FormField::Name, "  Kavya  ")
        .with(FormField::College, " X ");
    let payload = form.to_payload("ONSPOT-42").unwrap();
    assert_eq!(payload.uid, "ONSPOT-42");
    assert_eq!(payload.name, "Kavya");
    assert_eq!(payload.college, "X");
    assert_eq!(payload.year, "B.Tech");
}

#[test]
fn to_payload_propagates_validation_error() {
    let form = valid_form().with(FormField::Phone, "12");
    assert_eq!(
        form.to_payload("ONSPOT-1"),
        Err(RegistrationValidationError::InvalidPhone)
    );
}

#[test]
fn reference_list_membership_is_not_enforced() {
    let form = valid_form().with(FormField::College, "A College Nobody Listed");
    assert_eq!(form.validate(), Ok(()));
}
