use licence_docs_server::licence::cursor::LayoutCursor;

#[test]
fn test_position_is_running_sum_of_non_negative_advances() {
    let sequences: [&[f32]; 4] = [
        &[],
        &[0.0, 0.0, 0.0],
        &[7.0, 27.0, 4.0, 7.0, 32.0, 4.0],
        &[0.25, 1.5, 100.0, 0.125, 3.0],
    ];

    for amounts in sequences {
        let mut cursor = LayoutCursor::new(46.0);
        let mut expected = 46.0_f32;
        let mut previous = cursor.position();
        for &amount in amounts {
            expected += amount;
            let position = cursor.advance(amount);
            assert!(position >= previous);
            assert!((position - expected).abs() < 1e-3);
            previous = position;
        }
        assert!((cursor.position() - expected).abs() < 1e-3);
    }
}

#[test]
fn test_negative_amounts_do_not_break_monotonicity() {
    let mut cursor = LayoutCursor::new(0.0);
    let mut previous = cursor.position();
    for amount in [3.0, -5.0, 2.0, -0.5, 1.0] {
        let position = cursor.advance(amount);
        assert!(position >= previous);
        previous = position;
    }
    assert_eq!(cursor.position(), 6.0);
}
