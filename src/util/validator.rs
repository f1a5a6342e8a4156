use error_stack::Report;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            flatten(&errors)
                .into_iter()
                .fold(Report::new(Wrapper), |report, message| {
                    report.attach_printable(message)
                })
        })
    }
}

/// Flattens nested validation errors into `field.path: message` lines.
pub fn flatten(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    read_errors(errors, &mut Vec::new(), &mut messages);
    messages
}

fn read_errors<'a>(
    errors: &'a ValidationErrors,
    fields_queue: &mut Vec<Cow<'a, str>>,
    output: &mut Vec<String>,
) {
    let mut entries = errors.errors().iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        fields_queue.push(Cow::Borrowed(field));
        match kind {
            ValidationErrorsKind::Struct(inner) => read_errors(inner, fields_queue, output),
            ValidationErrorsKind::List(list) => {
                for (index, inner) in list {
                    fields_queue.push(Cow::Owned(index.to_string()));
                    read_errors(inner, fields_queue, output);
                    fields_queue.pop();
                }
            }
            ValidationErrorsKind::Field(field_errors) => {
                let field_str = fields_queue.join(".");
                for error in field_errors {
                    let message = error
                        .message
                        .as_deref()
                        .unwrap_or_else(|| error.code.as_ref());
                    output.push(format!("{field_str}: {message}"));
                }
            }
        }
        fields_queue.pop();
    }
}
