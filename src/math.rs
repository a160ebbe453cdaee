use num::Float;

/// Similar to numpy.interp, for a single x. Clamps to the first and last y outside of the
/// coordinate range; inside it, the first segment containing x wins.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }

    for pair in coords.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];

        // Actual interpolation
        if x1 <= x && x <= x2 {
            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Only reachable with unsorted coordinates
    last_y
}

/// Centroid x of the polygon chain through `vertices`, summing consecutive vertex pairs only.
/// The closing edge back to the first vertex is not part of the sum.
pub(crate) fn open_chain_centroid<F: Float>(vertices: &[(F, F)]) -> Option<F> {
    let two = F::one() + F::one();
    let six = two + two + two;
    let mut area = F::zero();
    let mut moment = F::zero();

    for pair in vertices.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let cross = x0 * y1 - x1 * y0;

        area = area + cross;
        moment = moment + (x0 + x1) * cross;
    }

    area = area / two;

    if area == F::zero() {
        return None;
    }

    Some(moment / (six * area))
}

#[test]
fn test_interp() {
    let coords = [(1., 3.), (2., 2.), (3., 0.)];
    let out: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].into_iter().map(|x| interp(x, &coords)).collect();

    assert_eq!(out, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];
    let out: Vec<f64> = [2.5, -1., 7.5].into_iter().map(|x| interp(x, &coords)).collect();

    assert_eq!(out, vec![4., 0., 2.]);
}

#[test]
fn test_interp_first_segment_wins() {
    // x = 50 sits at the end of [0, 50] and the start of [50, 50]
    let coords = [(0., 0.), (50., 1.), (50., 1.), (100., 0.)];

    assert_eq!(interp(50., &coords), 1.);
    assert_eq!(interp(0., &coords), 0.);
    assert_eq!(interp(100., &coords), 0.);

    // The upper clamp applies before any segment is scanned
    let shoulder = [(50., 0.), (100., 1.), (100., 0.)];

    assert_eq!(interp(100., &shoulder), 0.);
    assert_eq!(interp(75., &shoulder), 0.5);
}

#[test]
fn test_open_chain_centroid() {
    let trapezoid = [(0., 0.), (25., 1.), (75., 1.), (100., 0.)];

    assert_eq!(open_chain_centroid(&trapezoid), Some(50.));

    let skewed = [(0., 0.), (10., 1.), (20., 1.), (60., 0.)];
    // a = 0.5 * (0 + 10 - 20 - 60) = -35
    // sum = (10 + 20) * (10 - 20) + (20 + 60) * (-60) = -300 - 4800 = -5100
    let expected = -5100. / (6. * -35.);

    approx::assert_relative_eq!(open_chain_centroid(&skewed).unwrap(), expected);

    assert_eq!(open_chain_centroid(&[(5., 0.), (5., 1.), (5., 1.), (5., 0.)]), None);
}
