use std::collections::HashMap;

use proptest::prelude::*;
use reqlog_logging::capture::CaptureWriter;
use reqlog_logging::{Attr, LevelFilter, Logger};

fn binding() -> impl Strategy<Value = (String, String)> {
    (
        prop::sample::select(vec!["component", "operation", "tenant", "shard", "region"]),
        "[a-z0-9 =\"]{0,12}",
    )
        .prop_map(|(k, v)| (k.to_string(), v))
}

proptest! {
    #[test]
    fn emitted_record_is_union_of_bindings(
        chain in prop::collection::vec(prop::collection::vec(binding(), 0..4), 0..6),
        call_site in prop::collection::vec(binding(), 0..3),
    ) {
        let capture = CaptureWriter::new();
        let mut logger = Logger::builder("production", LevelFilter::INFO)
            .writer(capture.clone())
            .build();

        let mut expected: HashMap<String, String> = HashMap::new();
        for step in &chain {
            let before = logger.attrs().len();
            logger = logger.with_attrs(step.iter().map(|(k, v)| Attr::new(k.clone(), v.clone())));
            // bound set never shrinks along a derivation chain
            prop_assert!(logger.attrs().len() >= before);
            for (k, v) in step {
                expected.insert(k.clone(), v.clone());
            }
        }

        let site: Vec<Attr> = call_site
            .iter()
            .map(|(k, v)| Attr::new(k.clone(), v.clone()))
            .collect();
        for (k, v) in &call_site {
            expected.insert(k.clone(), v.clone());
        }

        logger.info("probe", &site);

        let lines = capture.json_lines().unwrap();
        prop_assert_eq!(lines.len(), 1);
        let object = lines[0].as_object().unwrap();
        for (k, v) in &expected {
            prop_assert_eq!(object.get(k).and_then(|x| x.as_str()), Some(v.as_str()));
        }
        // time, level, msg plus exactly the bound/call-site keys
        prop_assert_eq!(object.len(), expected.len() + 3);
    }

    #[test]
    fn text_output_is_always_one_line(value in "\\PC{0,40}") {
        let capture = CaptureWriter::new();
        let logger = Logger::builder("development", LevelFilter::INFO)
            .writer(capture.clone())
            .build();

        logger.info("probe", &[Attr::new("value", value)]);
        prop_assert_eq!(capture.output().matches('\n').count(), 1);
    }
}
