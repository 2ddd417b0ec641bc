use camino::Utf8Path;
use starlist::list_reader::{parse_target_list, read_target_list};
use starlist::units::{DEGREES, KM_PER_SECOND, MAS, MAS_PER_YEAR};
use starlist::{Quantity, SpaceSys, StarlistError};

#[test]
fn fixed_order_file_with_every_arity() {
    let path = Utf8Path::new("tests/data/target_list.txt");
    let targets = read_target_list(path, &SpaceSys::icrs()).unwrap();

    assert_eq!(targets.len(), 4);

    // 7 tokens: everything present
    let barnard = &targets[0];
    assert_eq!(barnard.source_name, "barnard");
    assert_eq!(barnard.source_coordinates.ra, Quantity::new(269.452, DEGREES));
    assert_eq!(barnard.pm_ra, Some(Quantity::new(-802.8, MAS_PER_YEAR)));
    assert_eq!(barnard.parallax, Some(Quantity::new(546.9, MAS)));
    assert_eq!(
        barnard.source_velocity,
        Some(Quantity::new(-110.5, KM_PER_SECOND))
    );

    // 6 tokens: radial velocity absent
    let proxima = &targets[1];
    assert_eq!(proxima.parallax, Some(Quantity::new(768.5, MAS)));
    assert!(proxima.source_velocity.is_none());

    // 5 tokens: proper motion only
    let kapteyn = &targets[2];
    assert_eq!(kapteyn.pm_dec, Some(Quantity::new(-5709.2, MAS_PER_YEAR)));
    assert!(kapteyn.parallax.is_none());

    // 3 tokens: coordinates only
    let teegarden = &targets[3];
    assert!(teegarden.pm_ra.is_none());
    assert!(teegarden.parallax.is_none());
    assert_eq!(teegarden.position_epoch, "J2000.0");
}

#[test]
fn incomplete_proper_motion_pair_is_rejected() {
    let err = parse_target_list("gamma,1.0,2.0,,", &SpaceSys::icrs()).unwrap_err();
    match err {
        StarlistError::MalformedLine { line, reason } => {
            assert_eq!(line, 1);
            assert!(reason.contains("pair"), "unexpected reason: {reason}");
        }
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

#[test]
fn line_numbers_count_the_whole_file() {
    let text = "# header\nalpha,1.0,2.0\n\nbeta,oops,4.0\n";
    let err = parse_target_list(text, &SpaceSys::icrs()).unwrap_err();
    assert!(matches!(err, StarlistError::MalformedLine { line: 4, .. }));
}
