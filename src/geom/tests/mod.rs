mod test_curve_basic;
mod test_kernel_basic;
