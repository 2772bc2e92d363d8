pub(crate) fn ceil_div(x: usize, divisor: usize) -> usize {
  (x + divisor - 1) / divisor
}
