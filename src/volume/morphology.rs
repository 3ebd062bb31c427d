use ndarray::Array3;

/// Morphological closing with a ball structuring element: dilation followed
/// by erosion. Fills holes and gaps up to roughly the kernel radius.
pub fn close(data: &Array3<u8>, radius: u32) -> Array3<u8> {
    if radius == 0 {
        return data.clone();
    }
    erode(&dilate(data, radius), radius)
}

/// Replace each voxel with the maximum over the ball neighborhood.
pub fn dilate(data: &Array3<u8>, radius: u32) -> Array3<u8> {
    neighborhood_scan(data, radius, 0, u8::max)
}

/// Replace each voxel with the minimum over the ball neighborhood.
pub fn erode(data: &Array3<u8>, radius: u32) -> Array3<u8> {
    neighborhood_scan(data, radius, u8::MAX, u8::min)
}

/// Voxel offsets inside a ball of the given radius.
fn ball_offsets(radius: u32) -> Vec<(isize, isize, isize)> {
    let r = radius as isize;
    let r2 = r * r;
    let mut offsets = Vec::new();
    for dz in -r..=r {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy + dz * dz <= r2 {
                    offsets.push((dx, dy, dz));
                }
            }
        }
    }
    offsets
}

/// Out-of-bounds voxels read as `border`: background for dilation,
/// foreground for erosion, so structures touching the volume boundary are
/// not eaten by closing.
fn neighborhood_scan(
    data: &Array3<u8>,
    radius: u32,
    border: u8,
    pick: fn(u8, u8) -> u8,
) -> Array3<u8> {
    let offsets = ball_offsets(radius);
    let (nx, ny, nz) = data.dim();
    let mut out = Array3::<u8>::zeros((nx, ny, nz));

    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let mut acc = data[[x, y, z]];
                for &(dx, dy, dz) in &offsets {
                    let ix = x as isize + dx;
                    let iy = y as isize + dy;
                    let iz = z as isize + dz;
                    let value = if ix >= 0
                        && iy >= 0
                        && iz >= 0
                        && (ix as usize) < nx
                        && (iy as usize) < ny
                        && (iz as usize) < nz
                    {
                        data[[ix as usize, iy as usize, iz as usize]]
                    } else {
                        border
                    };
                    acc = pick(acc, value);
                }
                out[[x, y, z]] = acc;
            }
        }
    }
    out
}
