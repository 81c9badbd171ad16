mod test_curved_planes_basic;
mod test_rotation_basic;
