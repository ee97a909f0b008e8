use crate::registry::{RunOptions, DEFAULT_MAX_CONSECUTIVE_TRANSPORT_ERRORS};
use crate::types::RunSection;
use crate::validate::validator::Validator;

pub(crate) fn lower_run(v: &mut Validator, section: Option<&RunSection>) -> Option<RunOptions> {
    let Some(section) = section else {
        return Some(RunOptions::default());
    };
    let mut ok = true;

    let report_interval = match &section.report_interval {
        Some(value) => match v.duration("run.reportInterval", value) {
            Some(d) if d.is_zero() => None,
            Some(d) => Some(d),
            None => {
                ok = false;
                None
            }
        },
        None => None,
    };

    let max_consecutive_transport_errors = match section.max_consecutive_transport_errors {
        None => DEFAULT_MAX_CONSECUTIVE_TRANSPORT_ERRORS,
        Some(n) if n > 0 && n <= u32::MAX as i64 => n as u32,
        Some(n) => {
            v.push(
                "run.maxConsecutiveTransportErrors",
                format!("must be a positive integer (got {n})"),
            );
            ok = false;
            DEFAULT_MAX_CONSECUTIVE_TRANSPORT_ERRORS
        }
    };

    ok.then(|| RunOptions {
        report_interval,
        fail_on_generator_failure: section.fail_on_generator_failure.unwrap_or(true),
        max_consecutive_transport_errors,
    })
}
