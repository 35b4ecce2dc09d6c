use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// 用户模型 -- 对应数据库中的 `users` 表
///
/// 请求体中的键名不区分大小写（`ID`、`Firstname`、`PassKey` 都能绑定），
/// 未知的键会被忽略，缺省字段为零值或空字符串，只有更新时的校验会拒绝不完整的数据。
/// `passkey` 只接收，不会被序列化输出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    #[validate(length(min = 1))]
    pub firstname: String,
    pub lastname: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(skip_serializing)]
    pub passkey: String,
}

// -- 键名统一转为小写后再绑定的字段集合
#[derive(Default, Deserialize)]
#[serde(default)]
struct UserFields {
    id: i32,
    firstname: String,
    lastname: String,
    email: String,
    passkey: String,
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let folded: Map<String, Value> = Map::<String, Value>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        let fields = UserFields::deserialize(Value::Object(folded)).map_err(de::Error::custom)?;

        Ok(User {
            id: fields.id,
            firstname: fields.firstname,
            lastname: fields.lastname,
            email: fields.email,
            passkey: fields.passkey,
        })
    }
}

impl User {
    /// 校验用户数据 -- id 不能为 0，firstname、email、passkey 不能为空
    ///
    /// 返回的错误信息列出所有不合法的字段
    pub fn is_valid(&self) -> Result<(), String> {
        let mut invalid: Vec<String> = Vec::new();

        if self.id == 0 {
            invalid.push("id".to_string());
        }

        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort_unstable();
            invalid.extend(fields);
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(format!("user data invalid: {}", invalid.join(", ")))
        }
    }
}
