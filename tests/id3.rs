use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_relative_eq;
use id3tree::*;


fn dataset_path(file: &str) -> PathBuf {
    let mut path = env::current_dir().unwrap();
    path.push("tests/dataset");
    path.push(file);
    path
}


fn golf() -> (Dataset, Dataset) {
    let schema = SchemaReader::default()
        .file(dataset_path("golf.attr"))
        .read()
        .unwrap();
    let schema = Arc::new(schema);
    let train = DatasetReader::default()
        .file(dataset_path("golf.train"))
        .schema(Arc::clone(&schema))
        .read()
        .unwrap();
    let test = DatasetReader::default()
        .file(dataset_path("golf.test"))
        .schema(schema)
        .read()
        .unwrap();
    (train, test)
}


fn weather(rows: &[[&str; 3]]) -> Dataset {
    let schema = Arc::new(Schema::new(vec![
        Attribute::continuous("Temp"),
        Attribute::discrete("Outlook", ["Sunny", "Rain"]),
        Attribute::discrete("Play", ["Yes", "No"]),
    ]).unwrap());
    let mut data = Dataset::new(Arc::clone(&schema));
    for (i, row) in rows.iter().enumerate() {
        let example = Example::parse(row, &schema, "weather", i + 1).unwrap();
        data.push(example).unwrap();
    }
    data
}


/// Tests for the ID3 decision tree.
#[cfg(test)]
pub mod id3_tests {
    use super::*;

    #[test]
    fn reads_golf() {
        let (train, test) = golf();
        assert_eq!(train.len(), 14);
        assert_eq!(test.len(), 4);
        assert_eq!(train.schema().len(), 5);

        let schema = train.schema();
        assert!(schema[schema.id_of("Humidity").unwrap()].is_continuous());
        assert_eq!(
            schema[schema.id_of("Outlook").unwrap()].values(),
            ["sunny", "overcast", "rain"]
        );
    }

    #[test]
    fn golf_tree() {
        let (train, test) = golf();
        let tree = DTreeBuilder::new(&train)
            .classifier("Play")
            .build()
            .unwrap();
        println!("{tree}");

        let expected = "\
            Outlook:overcast\n \
            <Yes>\n\
            Outlook:rain\n \
            Windy:false\n  \
            <Yes>\n \
            Windy:true\n  \
            <No>\n\
            Outlook:sunny\n \
            Humidity:<= 70\n  \
            <Yes>\n \
            Humidity:> 70\n  \
            <No>\n";
        assert_eq!(tree.to_string(), expected);
        assert_eq!(tree.n_leaves(), 5);
        assert_eq!(tree.depth(), 2);

        let play = tree.classifier();
        assert_eq!(tree.test(play, &train), train.len());
        assert_eq!(tree.test(play, &test), 3);

        let accuracy = tree.accuracy(&test);
        assert_eq!(accuracy.correct(), 3);
        assert_eq!(accuracy.total(), 4);
        assert_relative_eq!(accuracy.ratio(), 0.75);
    }

    #[test]
    fn predicts_labels() {
        let (train, test) = golf();
        let tree = DTreeBuilder::new(&train).build().unwrap();
        let predictions = test.iter()
            .map(|example| tree.predict(example))
            .collect::<Vec<_>>();
        assert_eq!(
            predictions,
            [Some("Yes"), Some("No"), Some("No"), Some("No")]
        );
    }

    #[test]
    fn weather_scenario() {
        let data = weather(&[
            ["70", "Sunny", "Yes"],
            ["75", "Sunny", "Yes"],
            ["85", "Rain", "No"],
        ]);
        let tree = DTreeBuilder::new(&data)
            .classifier("Play")
            .build()
            .unwrap();

        let schema = tree.schema();
        let outlook = schema.id_of("Outlook").unwrap();
        let play = schema.id_of("Play").unwrap();

        let root = tree.node(tree.root());
        match root.kind() {
            NodeKind::Internal { attribute, threshold, .. } => {
                assert_eq!(*attribute, outlook);
                assert_eq!(*threshold, None);
            },
            NodeKind::Leaf => panic!("the root should split on Outlook"),
        }

        let labels = root.children()
            .iter()
            .map(|&child| {
                assert!(tree.node(child).is_leaf());
                schema[play].label(tree.classification(child))
            })
            .collect::<Vec<_>>();
        assert_eq!(labels, ["No", "Yes"]);
        assert_eq!(tree.test(play, &data), 3);
    }

    #[test]
    fn pure_dataset_is_a_single_leaf() {
        let data = weather(&[
            ["70", "Sunny", "Yes"],
            ["85", "Rain", "Yes"],
            ["60", "Rain", "Yes"],
        ]);
        let play = data.schema().id_of("Play").unwrap();
        assert!(data.is_well_classified(play));
        assert_eq!(data.entropy(play), 0f64);

        let tree = DTreeBuilder::new(&data).build().unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.to_string(), "<Yes>\n");
    }

    #[test]
    fn induction_is_deterministic() {
        let (train, test) = golf();
        let first = DTreeBuilder::new(&train).build().unwrap();
        let second = DTreeBuilder::new(&train).build().unwrap();

        assert_eq!(first.to_string(), second.to_string());
        for example in train.iter().chain(test.iter()) {
            assert_eq!(first.predict(example), second.predict(example));
        }
    }

    #[test]
    fn entropy_is_bounded() {
        let (train, _) = golf();
        let schema = train.schema();
        let play = schema.id_of("Play").unwrap();
        let k = schema[play].values().len() as f64;

        let h = train.entropy(play);
        assert!((0f64..=k.log2()).contains(&h));
        // 9 Yes, 5 No.
        assert_relative_eq!(h, 0.940286, epsilon = 1e-6);

        for (attribute, _) in schema.iter().filter(|(id, _)| *id != play) {
            let (split, _) = entropy_by_attribute(&train, attribute, play)
                .unwrap();
            assert!(split <= h + 1e-12);
            assert!(information_gain(h, split) >= -1e-12);
        }
    }

    #[test]
    fn best_root_split_is_outlook() {
        let (train, _) = golf();
        let schema = train.schema();
        let play = schema.id_of("Play").unwrap();
        let candidates = schema.iter()
            .map(|(id, _)| id)
            .filter(|&id| id != play)
            .collect::<Vec<_>>();
        let candidates = schema.sorted_by_name(&candidates);

        let split = find_split_attribute(&train, &candidates, play).unwrap();
        assert_eq!(split.attribute, schema.id_of("Outlook").unwrap());
        assert_eq!(split.index, None);
        assert_relative_eq!(split.entropy, 0.693536, epsilon = 1e-6);
    }

    #[test]
    fn json_round_trip_classifies_identically() {
        let (train, test) = golf();
        let tree = DTreeBuilder::new(&train).build().unwrap();

        let json = tree.to_json().unwrap();
        let restored = DTree::from_json(&json).unwrap();

        assert_eq!(tree.to_string(), restored.to_string());
        let play = tree.classifier();
        assert_eq!(tree.test(play, &test), restored.test(play, &test));
        for example in test.iter() {
            assert_eq!(tree.predict(example), restored.predict(example));
        }
    }

    #[test]
    fn writes_dot_file() {
        let (train, _) = golf();
        let tree = DTreeBuilder::new(&train).build().unwrap();

        let mut path = env::temp_dir();
        path.push(format!("id3tree-golf-{}.dot", std::process::id()));
        tree.to_dot_file(&path).unwrap();

        let dot = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(dot.starts_with("graph DecisionTree {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("label = \"Outlook ?\""));
        assert!(dot.contains("label = \"<= 70\""));
    }

    #[test]
    fn rejects_unknown_values_with_position() {
        let schema = SchemaReader::default()
            .file(dataset_path("golf.attr"))
            .read()
            .unwrap();
        let err = DatasetReader::default()
            .file(dataset_path("golf.bad"))
            .schema(Arc::new(schema))
            .read()
            .unwrap_err();

        match &err {
            Id3Error::UnknownValue { source_name, line, value, .. } => {
                assert!(source_name.ends_with("golf.bad"));
                assert_eq!(*line, 2);
                assert_eq!(value, "foggy");
            },
            _ => panic!("unexpected error: {err}"),
        }
        assert!(err.to_string().contains("not in known values"));
    }
}
