#[cfg(test)]
mod conversion_tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    use cml2tf::convert::{convert, ConvertOptions, MAIN_TF, VARIABLES_TF};
    use cml2tf::loader::load_topology;
    use cml2tf::topology::Topology;
    use serde_yaml::Value;

    fn testdata(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("testdata").join(name)
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Link endpoints resolve to node labels and interface slots
    #[test]
    fn test_topology_model_from_export() {
        let document = load_topology(&testdata("topology.yaml")).unwrap();
        let topology = Topology::new(&document).unwrap();

        let node_names: Vec<_> = topology.nodes().iter().map(|n| n.name.clone().unwrap()).collect();
        assert_eq!(node_names, vec!["r1", "r2", "sw0", "ext-conn-0"]);

        let links = topology.links();
        assert_eq!(links.len(), 3);
        for link in links {
            assert_eq!(link.node_b.as_deref(), Some("sw0"));
        }
        assert_eq!(links[0].node_a.as_deref(), Some("r1"));
        assert_eq!(links[1].slot_b, Some(Value::from(1)));
        assert_eq!(links[2].node_a.as_deref(), Some("ext-conn-0"));
        assert_eq!(links[2].slot_b, Some(Value::from(2)));

        assert_eq!(topology.lab_title().unwrap().as_deref(), Some("Branch Office"));
    }

    #[test]
    fn test_segmented_configuration_uses_first_segment() {
        let document = load_topology(&testdata("topology.yaml")).unwrap();
        let topology = Topology::new(&document).unwrap();

        let r2 = &topology.nodes()[1].configuration;
        assert_eq!(r2.out(0).unwrap(), "hostname r2\n!\nend");
        assert!(!r2.oneline().unwrap());

        let sw0 = &topology.nodes()[2].configuration;
        assert!(sw0.empty().unwrap());
    }

    #[test]
    fn test_convert_inline_configurations() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("branch");
        let document = load_topology(&testdata("topology.yaml")).unwrap();

        convert(&document, &project, &ConvertOptions::default()).unwrap();

        assert_eq!(file_names(&project), vec![MAIN_TF, VARIABLES_TF]);
        let main_tf = fs::read_to_string(project.join(MAIN_TF)).unwrap();
        assert!(main_tf.contains("  title = \"Branch Office\"\n"));
        assert!(main_tf.contains("  configuration = <<-EOT\n    hostname r1\n    !\n"));
        assert!(main_tf.contains("  configuration = \"bridge0\"\n"));
        assert!(main_tf.contains("resource \"cml2_node\" \"ext-conn-0\" {"));
        assert!(main_tf.contains("  node_a = cml2_node.ext-conn-0.id\n"));
        assert!(!main_tf.contains("unused"));
    }

    #[test]
    fn test_convert_with_separate_config_files() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("branch");
        let document = load_topology(&testdata("topology.yaml")).unwrap();
        let options = ConvertOptions { configs: true, force: false };

        convert(&document, &project, &options).unwrap();

        assert_eq!(
            file_names(&project),
            vec!["ext-conn-0.cfg", MAIN_TF, "r1.cfg", "r2-ios_config.txt.cfg", VARIABLES_TF]
        );
        assert_eq!(
            fs::read_to_string(project.join("r2-ios_config.txt.cfg")).unwrap(),
            "hostname r2\n!\nend"
        );
        let main_tf = fs::read_to_string(project.join(MAIN_TF)).unwrap();
        assert!(main_tf.contains("  configuration = file(\"${path.module}/r1.cfg\")\n"));
    }

    #[test]
    fn test_convert_mini_topology_with_force() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("mini");
        fs::create_dir(&project).unwrap();
        let document = load_topology(&testdata("mini.yaml")).unwrap();

        let without_force = ConvertOptions { configs: true, force: false };
        assert!(convert(&document, &project, &without_force).is_err());

        let with_force = ConvertOptions { configs: true, force: true };
        convert(&document, &project, &with_force).unwrap();
        assert_eq!(file_names(&project), vec!["alpine-0-node.cfg.cfg", MAIN_TF, VARIABLES_TF]);

        // Lab fields that are empty strings are left out
        let main_tf = fs::read_to_string(project.join(MAIN_TF)).unwrap();
        assert!(main_tf.contains("  title = \"mini\"\n"));
        assert!(!main_tf.contains("notes ="));
    }

    #[test]
    fn test_convert_without_lab_section_fails() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("nolab");
        let document: Value = serde_yaml::from_str("nodes: []\nlinks: []\n").unwrap();

        assert!(convert(&document, &project, &ConvertOptions::default()).is_err());
        assert!(!project.exists());
    }

    /// Awkward exports still produce a consistent project
    #[test]
    fn test_convert_awkward_names_and_configs() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("awkward");
        let document: Value = serde_yaml::from_str(
            r#"
lab: {title: t, description: d, notes: n}
nodes:
  - id: n0
    label: r1.a
    interfaces: [{id: i0, slot: 0}]
    configuration: [{name: Main, content: hostname a}, {name: day0}]
  - id: n1
    label: r1_a
    interfaces: [{id: i0, slot: 0}]
    configuration: hostname b
  - id: n2
    interfaces: [eth0]
    configuration: hostname c
links:
  - {id: l0, n1: n0, i1: i0, n2: n1, i2: i0}
"#,
        )
        .unwrap();

        let options = ConvertOptions { configs: true, force: false };
        convert(&document, &project, &options).unwrap();
        assert_eq!(
            file_names(&project),
            vec![MAIN_TF, "n2.cfg", "r1.a-Main.cfg", "r1_a.cfg", VARIABLES_TF]
        );

        let main_tf = fs::read_to_string(project.join(MAIN_TF)).unwrap();
        assert!(main_tf.contains("resource \"cml2_node\" \"r1_a_2\" {"));
        assert!(main_tf.contains("  node_a = cml2_node.r1_a.id\n  node_b = cml2_node.r1_a_2.id\n"));
        assert!(main_tf.contains("file(\"${path.module}/n2.cfg\")"));
    }
}
