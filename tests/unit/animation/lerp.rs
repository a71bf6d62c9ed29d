use super::*;

#[test]
fn f64_lerp_hits_endpoints_exactly() {
    let a = 0.1;
    let b = 0.7;
    assert_eq!(f64::lerp(&a, &b, 0.0), a);
    assert_eq!(f64::lerp(&a, &b, 1.0), b);
    assert_eq!(f64::lerp(&0.0, &10.0, 0.5), 5.0);
    // Overshoot extrapolates.
    assert_eq!(f64::lerp(&0.0, &10.0, 1.5), 15.0);
}

#[test]
fn point_list_morphs_pairwise() {
    let closed = vec![
        Point::new(30.0, 100.0),
        Point::new(480.0, 380.0),
        Point::new(930.0, 100.0),
    ];
    let open = vec![
        Point::new(30.0, 100.0),
        Point::new(480.0, -220.0),
        Point::new(930.0, 100.0),
    ];
    let mid = Vec::<Point>::lerp(&closed, &open, 0.5);
    assert_eq!(mid[0], Point::new(30.0, 100.0));
    assert_eq!(mid[1], Point::new(480.0, 80.0));
    assert_eq!(mid[2], Point::new(930.0, 100.0));
}

#[test]
fn vec2_lerp() {
    let v = <Vec2 as Lerp>::lerp(&Vec2::new(0.0, 10.0), &Vec2::new(10.0, 0.0), 0.25);
    assert_eq!(v, Vec2::new(2.5, 7.5));
}

#[test]
fn point_lerp_goes_through_the_trait() {
    let a = Point::new(0.1, 0.3);
    let b = Point::new(0.7, -0.9);
    assert_eq!(<Point as Lerp>::lerp(&a, &b, 0.0), a);
    assert_eq!(<Point as Lerp>::lerp(&a, &b, 1.0), b);
    assert_eq!(
        <Point as Lerp>::lerp(&Point::ZERO, &Point::new(4.0, 8.0), 0.5),
        Point::new(2.0, 4.0)
    );
}
