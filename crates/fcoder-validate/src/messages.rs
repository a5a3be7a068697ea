//! User-facing message catalog.
//!
//! Generated messages are Vietnamese. Backend messages that the
//! translator passes through are left verbatim.

/// "`<label>` is required".
pub fn required(label: &str) -> String {
    format!("{label} là bắt buộc")
}

pub const EMAIL_INVALID: &str = "Vui lòng nhập địa chỉ email hợp lệ";
pub const USERNAME_INVALID: &str =
    "Tên đăng nhập phải có 3-20 ký tự và chỉ chứa chữ cái, số, và dấu gạch dưới";
pub const PASSWORD_WEAK: &str =
    "Mật khẩu phải có ít nhất 8 ký tự và chứa ít nhất 1 chữ hoa, 1 chữ thường và 1 số";
pub const PASSWORD_MISMATCH: &str = "Mật khẩu xác nhận không khớp";
pub const PHONE_INVALID: &str = "Vui lòng nhập số điện thoại Việt Nam hợp lệ";
pub const STUDENT_CODE_INVALID: &str = "Mã sinh viên phải có định dạng XX######";
pub const GITHUB_INVALID: &str = "Vui lòng nhập tên người dùng GitHub hợp lệ";
pub const FULL_NAME_INVALID: &str = "Họ tên phải có ít nhất 2 ký tự";
pub const CURRENT_TERM_INVALID: &str = "Học kỳ hiện tại phải từ 1 đến 10";
pub const AGE_INVALID: &str = "Bạn phải từ 16 tuổi trở lên";
pub const BIRTHDAY_INVALID: &str = "Vui lòng nhập ngày sinh hợp lệ";
pub const GENDER_INVALID: &str = "Vui lòng chọn giới tính hợp lệ";
pub const MAJOR_INVALID: &str = "Vui lòng chọn chuyên ngành hợp lệ";
pub const ROLE_ID_REQUIRED: &str = "ID vai trò là bắt buộc";
pub const LOGIN_FAILED: &str = "Tên đăng nhập hoặc mật khẩu không đúng. Vui lòng thử lại.";
pub const LOGIN_FAILED_CHECK_INFO: &str = "Đăng nhập thất bại. Vui lòng kiểm tra lại thông tin.";
pub const LOGIN_FAILED_RETRY: &str = "Đăng nhập thất bại. Vui lòng thử lại.";
pub const VALIDATION_FAILED: &str = "Lỗi xác thực dữ liệu";
pub const NETWORK_ERROR: &str = "Không thể kết nối đến server. Vui lòng kiểm tra kết nối mạng.";
pub const GENERAL_ERROR: &str = "Đã xảy ra lỗi không mong muốn. Vui lòng thử lại.";

/// Labels interpolated into [`required`].
pub mod labels {
    pub const USERNAME: &str = "Tên đăng nhập";
    pub const EMAIL: &str = "Email";
    pub const PASSWORD: &str = "Mật khẩu";
    pub const RE_PASSWORD: &str = "Xác nhận mật khẩu";
    pub const FULL_NAME: &str = "Họ tên";
    pub const PHONE: &str = "Số điện thoại";
    pub const STUDENT_CODE: &str = "Mã sinh viên";
    pub const GITHUB: &str = "Tên GitHub";
    pub const CURRENT_TERM: &str = "Học kỳ hiện tại";
    pub const BIRTHDAY: &str = "Ngày sinh";
    pub const GENDER: &str = "Giới tính";
    pub const MAJOR: &str = "Chuyên ngành";
}
